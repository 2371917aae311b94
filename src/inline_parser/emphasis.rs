//! Emphasis and strong emphasis with `*` and `_`.
//!
//! No delimiter stack: from an opening run, the nearest usable closing run
//! wins. That departs from CommonMark's inside-out matching on purpose, since
//! the inline tokenizer is greedy and left to right.

use crate::parser::{
    LineSpan, ParseContext, ParseResult, Parser, Watchdog, parse_inline_content,
    update_keeps_delimiters,
};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct EmphasisParser;

/// Check if a character is Unicode whitespace
fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Check if a character is punctuation
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Number of consecutive `delim` characters at the start of `text`.
pub(crate) fn run_length(text: &str, delim: char) -> usize {
    text.chars().take_while(|&c| c == delim).count() * delim.len_utf8()
}

/// Not followed by whitespace; if followed by punctuation, preceded by
/// whitespace. Stricter than CommonMark, which also accepts punctuation
/// before the run.
pub(crate) fn is_left_flanking(span: &LineSpan<'_>, at: usize, run: usize) -> bool {
    let before = span.char_before(at);
    let after = span.char_at(at + run);
    let followed_by_whitespace = after.is_none_or(is_whitespace);
    let followed_by_punctuation = after.is_some_and(is_punctuation);
    let preceded_by_whitespace = before.is_none_or(is_whitespace);
    !followed_by_whitespace && (!followed_by_punctuation || preceded_by_whitespace)
}

/// Mirror image of [`is_left_flanking`].
pub(crate) fn is_right_flanking(span: &LineSpan<'_>, at: usize, run: usize) -> bool {
    let before = span.char_before(at);
    let after = span.char_at(at + run);
    let followed_by_whitespace = after.is_none_or(is_whitespace);
    let preceded_by_whitespace = before.is_none_or(is_whitespace);
    let preceded_by_punctuation = before.is_some_and(is_punctuation);
    !preceded_by_whitespace && (!preceded_by_punctuation || followed_by_whitespace)
}

fn can_open(span: &LineSpan<'_>, at: usize, run: usize, delim: char) -> bool {
    let left = is_left_flanking(span, at, run);
    // intraword underscores never open
    if delim == '_' {
        return left && !span.char_before(at).is_some_and(char::is_alphanumeric);
    }
    left
}

fn can_close(span: &LineSpan<'_>, at: usize, run: usize, delim: char) -> bool {
    let right = is_right_flanking(span, at, run);
    if delim == '_' {
        return right && !span.char_at(at + run).is_some_and(char::is_alphanumeric);
    }
    right
}

/// Offset of the nearest unescaped run of `delim` after the opening run that
/// can close it. With `exact`, the closing run must have the opener's length,
/// otherwise it must be at least as long.
pub(crate) fn find_closer(
    span: &LineSpan<'_>,
    delim: char,
    run: usize,
    exact: bool,
) -> ParseResult<Option<usize>> {
    let text = span.as_str();
    let mut watchdog = Watchdog::new("delimiter run");
    let mut pos = run;
    while pos < text.len() {
        watchdog.advance(pos)?;
        let Some(c) = text[pos..].chars().next() else {
            break;
        };
        if c == '\\' {
            pos += 1 + text[pos + 1..].chars().next().map_or(0, char::len_utf8);
            continue;
        }
        if c == delim {
            let len = run_length(&text[pos..], delim);
            let fits = if exact { len == run } else { len >= run };
            if fits && can_close(span, pos, len, delim) {
                return Ok(Some(pos));
            }
            pos += len;
            continue;
        }
        pos += c.len_utf8();
    }
    Ok(None)
}

/// Shared by emphasis and strike-through: opener literal, nested inline
/// content, closer literal.
pub(crate) fn build_delimited(
    cx: &ParseContext<'_>,
    doc: &mut ParsedDocument,
    kind: ElementKind,
    span: LineSpan<'_>,
    run: usize,
    close: usize,
) -> ParseResult<Option<ElementKey>> {
    let text = span.as_str();
    let element = doc.create_element(kind);
    doc.add_line(element);
    doc.add_literal(element, &text[..run], span.start())?;
    if !parse_inline_content(&cx.nested(), doc, element, span.sub(run, close))? {
        return Ok(None);
    }
    doc.add_literal(element, &text[close..close + run], span.start() + close)?;
    doc.element_mut(element).is_fully_parsed = true;
    Ok(Some(element))
}

impl Parser for EmphasisParser {
    fn element_type(&self) -> ElementType {
        ElementType::Emphasis
    }

    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if previous.is_some() || cx.depth() >= cx.config().max_inline_depth {
            return Ok(None);
        }
        let text = span.as_str();
        let Some(delim) = text.chars().next().filter(|c| matches!(c, '*' | '_')) else {
            return Ok(None);
        };
        let run = run_length(text, delim);
        if run > 3 || !can_open(&span, 0, run, delim) {
            return Ok(None);
        }
        let Some(close) = find_closer(&span, delim, run, false)? else {
            return Ok(None);
        };
        if close <= run {
            return Ok(None);
        }
        log::trace!("Emphasis {}x{} at {}", run, delim, span.start());
        build_delimited(
            cx,
            doc,
            ElementKind::Emphasis {
                delimiter: delim,
                run,
            },
            span,
            run,
            close,
        )
    }

    fn can_update(
        &self,
        _cx: &ParseContext<'_>,
        doc: &ParsedDocument,
        _original: ElementKey,
        update: &ContentUpdate,
        replaced: &str,
    ) -> bool {
        update_keeps_delimiters(doc, update, replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flanking_rules() {
        let span = LineSpan::new("a * foo bar*", 0);
        assert!(!is_left_flanking(&span, 2, 1));
        assert!(is_right_flanking(&span, 11, 1));
        assert!(!is_left_flanking(&span, 11, 1));

        let span = LineSpan::new("*foo*", 0);
        assert!(is_left_flanking(&span, 0, 1));
        assert!(is_right_flanking(&span, 4, 1));
    }

    #[test]
    fn punctuation_needs_space_before() {
        // `*` followed by `"` only opens after whitespace
        let span = LineSpan::new("a*\"foo\"*", 0);
        assert!(!is_left_flanking(&span, 1, 1));
        let span = LineSpan::new("(*\"foo\"*)", 0);
        assert!(!is_left_flanking(&span, 1, 1));
        let span = LineSpan::new("a *\"foo\"*", 0);
        assert!(is_left_flanking(&span, 2, 1));
    }

    #[test]
    fn punctuation_needs_space_after_closer() {
        let span = LineSpan::new("*x.*)", 0);
        assert!(!is_right_flanking(&span, 3, 1));
        let span = LineSpan::new("*x.* y", 0);
        assert!(is_right_flanking(&span, 3, 1));
        let span = LineSpan::new("*x.*", 0);
        assert!(is_right_flanking(&span, 3, 1));
    }

    #[test]
    fn nearest_closer_wins() {
        let span = LineSpan::new("*a *b* c*", 0);
        assert_eq!(find_closer(&span, '*', 1, false).unwrap(), Some(5));
    }

    #[test]
    fn escaped_delimiters_are_skipped() {
        let span = LineSpan::new(r"*a\*b*", 0);
        assert_eq!(find_closer(&span, '*', 1, false).unwrap(), Some(5));
    }

    #[test]
    fn closer_must_be_long_enough() {
        let span = LineSpan::new("**a* b**", 0);
        assert_eq!(find_closer(&span, '*', 2, false).unwrap(), Some(6));
    }

    #[test]
    fn intraword_underscore_does_not_open() {
        let span = LineSpan::new("snake_case_name", 0);
        assert!(!can_open(&span, 5, 1, '_'));
        let span = LineSpan::new("_word_", 0);
        assert!(can_open(&span, 0, 1, '_'));
        assert!(can_close(&span, 5, 1, '_'));
    }

    #[test]
    fn adversarial_delimiter_string_terminates() {
        let text = "*".repeat(1000) + &"a*".repeat(1000) + &"\\".repeat(999);
        let span = LineSpan::new(&text, 0);
        assert_eq!(find_closer(&span, '*', 1000, false).unwrap(), None);
    }
}
