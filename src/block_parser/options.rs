//! `{default; key=value; ...}` metadata blocks.
//!
//! A block opens with `{`. The first entry may be a bare default value; every
//! later entry must be `key=value`. Entries are separated by `;` and the block
//! ends at `}`. While unclosed it continues onto following lines of its owner.
//! An entry that does not parse ends the block right before it: the block is
//! then finished but unclosed, so lookups answer nothing, and the rest of the
//! line goes back to the owner as ordinary content.

use crate::parser::{
    InternalError, LineSpan, ParseContext, ParseResult, Parser, Watchdog, adopt_single_line,
};
use crate::syntax::{
    ContentUpdate, ElementKey, ElementKind, ElementType, LineKey, OptionsBlock, ParsedDocument,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct OptionsParser;

/// Outcome of scanning one line of an options block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionsScan {
    /// Bytes of the line that belong to the block.
    pub consumed: usize,
    pub block: OptionsBlock,
    /// Closed, or cut short by a bad entry.
    pub finished: bool,
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Scans one line of a block.
///
/// With `opening` the line must start with `{`; otherwise it continues
/// `block`. A continuation line whose first entry is bad is declined.
pub(crate) fn scan_options(
    text: &str,
    opening: bool,
    block: &OptionsBlock,
) -> ParseResult<Option<OptionsScan>> {
    let mut block = block.clone();
    let mut pos = if opening {
        if !text.starts_with('{') {
            return Ok(None);
        }
        1
    } else {
        0
    };
    let mut first_on_line = true;
    let mut watchdog = Watchdog::new("options entries");

    loop {
        watchdog.advance(pos)?;
        let rest = &text[pos..];
        let entry_len = rest.find([';', '}']).unwrap_or(rest.len());
        let entry = rest[..entry_len].trim();
        let delimiter = rest[entry_len..].chars().next();

        let accepted = if entry.is_empty() {
            true
        } else if let Some((key, value)) = entry.split_once('=') {
            let key = key.trim();
            if is_valid_key(key) {
                block.entries.push((key.to_string(), value.trim().to_string()));
                true
            } else {
                false
            }
        } else if block.default_value.is_none() && block.entries.is_empty() {
            block.default_value = Some(entry.to_string());
            true
        } else {
            false
        };

        if !accepted {
            if first_on_line && !opening {
                log::trace!("Options continuation declined at {:?}", entry);
                return Ok(None);
            }
            log::debug!("Options block stopped at bad entry {:?}", entry);
            return Ok(Some(OptionsScan {
                consumed: pos,
                block,
                finished: true,
            }));
        }
        first_on_line = false;

        match delimiter {
            Some('}') => {
                block.closed = true;
                return Ok(Some(OptionsScan {
                    consumed: pos + entry_len + 1,
                    block,
                    finished: true,
                }));
            }
            Some(_) => pos += entry_len + 1,
            None => {
                return Ok(Some(OptionsScan {
                    consumed: text.len(),
                    block,
                    finished: false,
                }));
            }
        }
    }
}

/// A closed block at the end of `text`, starting from the last `{`.
///
/// Returns its start and scan when only whitespace follows it.
pub(crate) fn trailing_options(text: &str) -> ParseResult<Option<(usize, OptionsScan)>> {
    let Some(at) = text.rfind('{') else {
        return Ok(None);
    };
    let Some(scan) = scan_options(&text[at..], true, &OptionsBlock::default())? else {
        return Ok(None);
    };
    let after = &text[at + scan.consumed..];
    if scan.block.closed && after.trim().is_empty() {
        Ok(Some((at, scan)))
    } else {
        Ok(None)
    }
}

/// Creates an options element from a finished scan of `span`'s start.
pub(crate) fn create_options(
    doc: &mut ParsedDocument,
    span: LineSpan<'_>,
    scan: OptionsScan,
) -> ParseResult<ElementKey> {
    let options = doc.create_element(ElementKind::Options(scan.block));
    doc.add_line(options);
    doc.add_literal(options, &span.as_str()[..scan.consumed], span.start())?;
    doc.element_mut(options).is_fully_parsed = scan.finished;
    Ok(options)
}

impl Parser for OptionsParser {
    fn element_type(&self) -> ElementType {
        ElementType::Options
    }

    fn parse_line(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        let Some(options) = previous else {
            let Some(scan) = scan_options(span.as_str(), true, &OptionsBlock::default())? else {
                return Ok(None);
            };
            return create_options(doc, span, scan).map(Some);
        };

        let current = match doc.element(options).kind() {
            ElementKind::Options(block) => block.clone(),
            other => {
                return Err(InternalError::invariant(format!(
                    "options parser asked to continue {}",
                    other.element_type()
                )));
            }
        };
        if current.closed {
            return Ok(None);
        }
        let Some(scan) = scan_options(span.as_str(), false, &current)? else {
            return Ok(None);
        };
        doc.add_line(options);
        doc.add_literal(options, &span.as_str()[..scan.consumed], span.start())?;
        let element = doc.element_mut(options);
        element.kind = ElementKind::Options(scan.block);
        element.is_fully_parsed = scan.finished;
        Ok(Some(options))
    }

    fn parse_line_update(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        original: ElementKey,
        _line: LineKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        let element = doc.element(original);
        let was_closed = element.kind().options().is_some_and(OptionsBlock::is_closed);
        if element.lines().len() != 1 {
            log::debug!("Multi-line options block {} needs a reparse", element.id());
            return Ok(None);
        }
        let Some(fresh) = self.parse_line(cx, doc, None, span)? else {
            return Ok(None);
        };
        let is_closed = doc
            .element(fresh)
            .kind()
            .options()
            .is_some_and(OptionsBlock::is_closed);
        if is_closed != was_closed {
            return Ok(None);
        }
        adopt_single_line(doc, fresh, original, span)
    }

    fn can_update(
        &self,
        _cx: &ParseContext<'_>,
        _doc: &ParsedDocument,
        _original: ElementKey,
        update: &ContentUpdate,
        replaced: &str,
    ) -> bool {
        !update.text.contains(['{', '}']) && !replaced.contains(['{', '}'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(text: &str) -> OptionsScan {
        scan_options(text, true, &OptionsBlock::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn default_and_entries() {
        let scan = open("{rust; echo=false; fig-width = 7} tail");
        assert_eq!(scan.consumed, "{rust; echo=false; fig-width = 7}".len());
        assert!(scan.finished);
        assert_eq!(scan.block.default_value(), Some("rust"));
        assert_eq!(scan.block.get("echo"), Some("false"));
        assert_eq!(scan.block.get("fig-width"), Some("7"));
    }

    #[test]
    fn unclosed_block_takes_the_line() {
        let scan = open("{ k1=v1; k2=v2");
        assert_eq!(scan.consumed, 14);
        assert!(!scan.finished);
        assert!(!scan.block.is_closed());
        assert_eq!(scan.block.len(), 2);
    }

    #[test]
    fn continuation_closes_block() {
        let first = open("{ k1=v1; k2=v2");
        let next = scan_options("k3=v3 }", false, &first.block)
            .unwrap()
            .unwrap();
        assert!(next.finished);
        assert_eq!(next.consumed, 7);
        assert_eq!(next.block.get("k3"), Some("v3"));
        assert_eq!(next.block.get("k1"), Some("v1"));
    }

    #[test]
    fn bad_entry_stops_the_block() {
        let scan = open("{a=1; not an entry} rest");
        assert_eq!(scan.consumed, "{a=1;".len());
        assert!(scan.finished);
        assert!(!scan.block.is_closed());
        assert_eq!(scan.block.get("a"), None);
        assert_eq!(scan.block.raw_entries().len(), 1);
    }

    #[test]
    fn default_only_allowed_first() {
        let first = open("{k=v");
        let next = scan_options("plain words", false, &first.block).unwrap();
        assert_eq!(next, None);
    }

    #[test]
    fn trailing_block_must_end_the_text() {
        let (at, scan) = trailing_options("Title {#intro; level=2}  ")
            .unwrap()
            .unwrap();
        assert_eq!(at, 6);
        assert_eq!(scan.block.default_value(), Some("#intro"));
        assert_eq!(trailing_options("Title {x} more").unwrap(), None);
        assert_eq!(trailing_options("Title {x").unwrap(), None);
        assert_eq!(trailing_options("no braces").unwrap(), None);
    }

    #[test]
    fn invalid_key_is_a_bad_entry() {
        let scan = open("{ok=1; bad key=2}");
        assert_eq!(scan.consumed, "{ok=1;".len());
        assert_eq!(scan.block.raw_entries(), &[("ok".to_string(), "1".to_string())]);
    }
}
