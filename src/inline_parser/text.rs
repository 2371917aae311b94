//! Plain text runs, the inline fallback.

use crate::parser::{
    LineSpan, ParseContext, ParseResult, Parser, Watchdog, is_plain, update_is_plain,
};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, ParsedDocument};

/// Characters where a run stops so that a richer inline parser gets a chance.
const STOP_CHARS: &[char] = &['*', '_', '~', '`', '['];

#[derive(Debug, Default, Clone, Copy)]
pub struct TextParser;

/// Length of the text run at the start of `text`.
///
/// Always takes the first character, so the run is never empty for non-empty
/// input. A backslash and the punctuation after it are taken as a pair.
pub(crate) fn scan_text(text: &str) -> ParseResult<usize> {
    let mut watchdog = Watchdog::new("text run");
    let mut pos = 0;
    while pos < text.len() {
        watchdog.advance(pos)?;
        let Some(c) = text[pos..].chars().next() else {
            break;
        };
        if pos > 0 && STOP_CHARS.contains(&c) {
            break;
        }
        if c == '\\'
            && let Some(next) = text[pos + 1..].chars().next()
            && next.is_ascii_punctuation()
        {
            pos += 1 + next.len_utf8();
            continue;
        }
        pos += c.len_utf8();
    }
    Ok(pos)
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

fn trailing_whitespace(text: &str) -> usize {
    text.len() - text.trim_end().len()
}

impl Parser for TextParser {
    fn element_type(&self) -> ElementType {
        ElementType::Text
    }

    fn parse_line(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if previous.is_some() || span.is_empty() {
            return Ok(None);
        }
        let consumed = scan_text(span.as_str())?;
        let text = doc.create_element(ElementKind::Text);
        doc.add_line(text);
        doc.add_literal(text, &span.as_str()[..consumed], span.start())?;
        doc.element_mut(text).is_fully_parsed = true;
        Ok(Some(text))
    }

    /// Only plain runs take edits, strictly inside, and only when the
    /// surrounding whitespace stays as it is.
    fn can_update(
        &self,
        _cx: &ParseContext<'_>,
        doc: &ParsedDocument,
        original: ElementKey,
        update: &ContentUpdate,
        replaced: &str,
    ) -> bool {
        let Some(range) = doc.element_range(original) else {
            return false;
        };
        if update.change_start() <= range.start || update.change_end() >= range.end {
            return false;
        }
        let old = doc.element_text(original);
        if !is_plain(&old) || !update_is_plain(update, replaced) {
            return false;
        }
        // Spacing after a leading `#` decides whether a line is a heading.
        if old.trim_start().starts_with('#') {
            return false;
        }
        let Some(new) = update.apply_at(&old, range.start) else {
            return false;
        };
        leading_whitespace(&old) == leading_whitespace(&new)
            && trailing_whitespace(&old) == trailing_whitespace(&new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_before_inline_markup() {
        assert_eq!(scan_text("hello *world*").unwrap(), 6);
        assert_eq!(scan_text("plain").unwrap(), 5);
        assert_eq!(scan_text("a [link](x)").unwrap(), 2);
    }

    #[test]
    fn takes_leading_markup_character() {
        assert_eq!(scan_text("* foo").unwrap(), 5);
        assert_eq!(scan_text("*").unwrap(), 1);
    }

    #[test]
    fn escapes_are_taken_as_pairs() {
        assert_eq!(scan_text(r"a \*b\* c").unwrap(), 9);
        assert_eq!(scan_text(r"\_x").unwrap(), 3);
    }

    #[test]
    fn multibyte_characters() {
        assert_eq!(scan_text("héllo *x*").unwrap(), "héllo ".len());
    }
}
