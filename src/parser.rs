//! The parser protocol shared by every grammar, plus the generic dispatch
//! that drives ordered sets of parsers.

use crate::config::Config;
use crate::syntax::{ContentUpdate, ElementKey, ElementType, LineKey, ParsedDocument};

mod dispatch;
mod error;
mod registry;
mod watchdog;

pub use dispatch::{parse_block, parse_inline_content};
pub use error::{InternalError, ParseError};
pub use registry::Registry;
pub use watchdog::Watchdog;

pub type ParseResult<T> = Result<T, InternalError>;

/// A window onto one physical line of the current document text.
///
/// `from..to` is the part a parser is asked to consume. Neighbouring
/// characters outside the window stay visible through
/// [`char_before`](Self::char_before) and [`char_at`](Self::char_at) so that
/// flanking rules see the same context whether a run is parsed as part of a
/// full line or on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    source: &'a str,
    base: usize,
    from: usize,
    to: usize,
}

impl<'a> LineSpan<'a> {
    /// The whole of `line`, which starts at document offset `base`.
    pub fn new(line: &'a str, base: usize) -> Self {
        Self {
            source: line,
            base,
            from: 0,
            to: line.len(),
        }
    }

    pub fn as_str(&self) -> &'a str {
        &self.source[self.from..self.to]
    }

    /// The complete physical line this span lies in.
    pub fn line(&self) -> &'a str {
        self.source
    }

    /// Document offset of the first byte.
    pub fn start(&self) -> usize {
        self.base + self.from
    }

    pub fn end(&self) -> usize {
        self.base + self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Whether the span begins at the start of its physical line.
    pub fn is_line_start(&self) -> bool {
        self.from == 0
    }

    /// Sub-span with offsets relative to this span's start.
    pub fn sub(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.len());
        Self {
            source: self.source,
            base: self.base,
            from: self.from + from.min(to),
            to: self.from + to,
        }
    }

    pub fn tail(&self, from: usize) -> Self {
        self.sub(from, self.len())
    }

    pub fn head(&self, to: usize) -> Self {
        self.sub(0, to)
    }

    /// Character ending right before relative offset `rel`, looking past the
    /// span start if needed.
    pub fn char_before(&self, rel: usize) -> Option<char> {
        self.source[..self.from + rel].chars().next_back()
    }

    /// Character starting at relative offset `rel`, looking past the span end
    /// if needed.
    pub fn char_at(&self, rel: usize) -> Option<char> {
        self.source[self.from + rel..].chars().next()
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Typed context threaded through nested parsing.
#[derive(Clone, Copy)]
pub struct ParseContext<'r> {
    registry: &'r Registry,
    in_link: bool,
    depth: usize,
}

impl<'r> ParseContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            in_link: false,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &'r Config {
        self.registry.config()
    }

    pub fn parser(&self, ty: ElementType) -> &'r dyn Parser {
        self.registry.get(ty)
    }

    /// Whether we are inside link text, where links may not nest.
    pub fn in_link(&self) -> bool {
        self.in_link
    }

    /// Inline nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    pub fn inside_link(&self) -> Self {
        Self {
            in_link: true,
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Inline parsers in precedence order for this context.
    pub fn inline_order(&self) -> &'r [ElementType] {
        if self.in_link {
            self.registry.link_text_order()
        } else {
            self.registry.inline_order()
        }
    }
}

/// Per-type grammar strategy.
///
/// `Ok(None)` is the normal "does not match here" answer; errors are reserved
/// for broken invariants.
pub trait Parser {
    fn element_type(&self) -> ElementType;

    /// With no `previous`, start a new element on `span` or decline. With a
    /// `previous` element, extend it with one more line and return that same
    /// key, or decline without touching it.
    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>>;

    /// Reparse one line of `original` in isolation and return a replacement
    /// line owned by `original`.
    ///
    /// `line` is the line being replaced and `span` its text after the edit.
    /// The default parses `span` as a fresh element of this type and adopts
    /// its single line when it consumes exactly the span.
    fn parse_line_update(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        original: ElementKey,
        line: LineKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        let _ = line;
        let Some(fresh) = self.parse_line(cx, doc, None, span)? else {
            return Ok(None);
        };
        adopt_single_line(doc, fresh, original, span)
    }

    /// Cheap guard run before [`parse_line_update`](Self::parse_line_update).
    fn can_update(
        &self,
        cx: &ParseContext<'_>,
        doc: &ParsedDocument,
        original: ElementKey,
        update: &ContentUpdate,
        replaced: &str,
    ) -> bool {
        let _ = (cx, doc, original, update, replaced);
        true
    }

    /// Whether this grammar would claim `span` as the start of a new element.
    fn should_interrupt(
        &self,
        cx: &ParseContext<'_>,
        element: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<bool> {
        let _ = element;
        let mut scratch = ParsedDocument::new();
        Ok(self.parse_line(cx, &mut scratch, None, span)?.is_some())
    }
}

/// Moves the only line of a freshly parsed element onto `original`.
///
/// Declines when the fresh element does not cover `span` exactly or has a
/// different type; fails when it has other than one line.
pub(crate) fn adopt_single_line(
    doc: &mut ParsedDocument,
    fresh: ElementKey,
    original: ElementKey,
    span: LineSpan<'_>,
) -> ParseResult<Option<LineKey>> {
    let element = doc.element(fresh);
    let [line] = element.lines() else {
        return Err(InternalError::invariant(format!(
            "{} reparsed one line into {} lines",
            element.element_type(),
            element.lines().len()
        )));
    };
    let line = *line;
    if element.element_type() != doc.element(original).element_type()
        || doc.node_range(line) != Some(span.start()..span.end())
    {
        return Ok(None);
    }
    let kind = element.kind().clone();
    doc.adopt_line(line, fresh, original);
    doc.element_mut(original).kind = kind;
    Ok(Some(line))
}

/// Characters that may change inline structure when inserted or removed.
pub(crate) const SIGNIFICANT_CHARS: &[char] = &[
    '*', '_', '~', '`', '[', ']', '(', ')', '!', '\\', '{', '}', '<', '>', '"',
];

pub(crate) fn is_plain(text: &str) -> bool {
    !text.contains(SIGNIFICANT_CHARS)
}

/// Rejects edits that insert or remove inline-significant characters.
pub(crate) fn update_is_plain(update: &ContentUpdate, replaced: &str) -> bool {
    let plain = is_plain(&update.text) && is_plain(replaced);
    if !plain {
        log::debug!("Refusing update touching inline syntax: {:?}", update);
    }
    plain
}

/// Like [`update_is_plain`], and no delimiter run gains or loses a
/// neighbouring character.
pub(crate) fn update_keeps_delimiters(
    doc: &ParsedDocument,
    update: &ContentUpdate,
    replaced: &str,
) -> bool {
    if !update_is_plain(update, replaced) {
        return false;
    }
    let Some(&line) = doc
        .physical_line_at(update.change_start())
        .and_then(|index| doc.element(doc.root()).lines().get(index))
    else {
        return false;
    };
    let Some(start) = doc.node_start(line) else {
        return false;
    };
    let text = doc.as_text(line);
    let before = update
        .change_start()
        .checked_sub(start)
        .and_then(|at| text.get(..at))
        .map(|head| head.chars().next_back());
    let after = update
        .change_end()
        .checked_sub(start)
        .and_then(|at| text.get(at..))
        .map(|tail| tail.chars().next());
    let (Some(before), Some(after)) = (before, after) else {
        return false;
    };
    let plain = |c: Option<char>| c.is_none_or(|c| !SIGNIFICANT_CHARS.contains(&c));
    if !(plain(before) && plain(after)) {
        log::debug!("Refusing update next to a delimiter: {:?}", update);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_spans_keep_document_offsets() {
        let span = LineSpan::new("hello *world*", 100);
        let inner = span.sub(7, 12);
        assert_eq!(inner.as_str(), "world");
        assert_eq!(inner.start(), 107);
        assert_eq!(inner.end(), 112);
        assert_eq!(inner.char_before(0), Some('*'));
        assert_eq!(inner.char_at(inner.len()), Some('*'));
        assert_eq!(inner.tail(2).as_str(), "rld");
        assert_eq!(inner.head(2).as_str(), "wo");
    }

    #[test]
    fn sub_span_is_clamped() {
        let span = LineSpan::new("abc", 0);
        assert_eq!(span.sub(1, 10).as_str(), "bc");
        assert_eq!(span.sub(5, 10).as_str(), "");
    }

    #[test]
    fn line_edges_have_no_neighbours() {
        let span = LineSpan::new("ab", 0);
        assert_eq!(span.char_before(0), None);
        assert_eq!(span.char_at(2), None);
        assert!(span.is_line_start());
        assert!(!span.tail(1).is_line_start());
    }

    #[test]
    fn plain_text_detection() {
        assert!(is_plain("just words, and 1 + 2."));
        assert!(!is_plain("a*b"));
        assert!(!is_plain("!"));
        assert!(!is_plain("{"));
    }
}
