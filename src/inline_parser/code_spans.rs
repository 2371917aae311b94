//! Inline code spans (`code`).

use crate::parser::{
    LineSpan, ParseContext, ParseResult, Parser, Watchdog, is_plain, update_is_plain,
};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct CodeSpanParser;

/// Try to parse a code span starting at the current position.
/// Returns (total_len, code_content, backtick_count) if successful.
pub(crate) fn try_parse_code_span(text: &str) -> ParseResult<Option<(usize, &str, usize)>> {
    let opening_backticks = text.bytes().take_while(|&b| b == b'`').count();
    if opening_backticks == 0 {
        return Ok(None);
    }
    let rest = &text[opening_backticks..];

    let mut watchdog = Watchdog::new("code span");
    let mut pos = 0;
    while let Some(c) = rest[pos..].chars().next() {
        watchdog.advance(pos)?;
        if c != '`' {
            pos += c.len_utf8();
            continue;
        }
        let closing_backticks = rest[pos..].bytes().take_while(|&b| b == b'`').count();
        if closing_backticks == opening_backticks {
            let total_len = opening_backticks + pos + closing_backticks;
            return Ok(Some((total_len, &rest[..pos], opening_backticks)));
        }
        // A run of the wrong length is skipped whole.
        pos += closing_backticks;
    }
    Ok(None)
}

impl Parser for CodeSpanParser {
    fn element_type(&self) -> ElementType {
        ElementType::CodeSpan
    }

    fn parse_line(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if previous.is_some() {
            return Ok(None);
        }
        let Some((total_len, _, backticks)) = try_parse_code_span(span.as_str())? else {
            return Ok(None);
        };
        let code = doc.create_element(ElementKind::CodeSpan { backticks });
        doc.add_line(code);
        doc.add_literal(code, &span.as_str()[..total_len], span.start())?;
        doc.element_mut(code).is_fully_parsed = true;
        Ok(Some(code))
    }

    /// Code content is verbatim, but emphasis closers are searched straight
    /// through it, so spans holding markup characters are left alone.
    fn can_update(
        &self,
        _cx: &ParseContext<'_>,
        doc: &ParsedDocument,
        original: ElementKey,
        update: &ContentUpdate,
        replaced: &str,
    ) -> bool {
        let text = doc.element_text(original);
        let backticks = text.bytes().take_while(|&b| b == b'`').count();
        let content = text.get(backticks..text.len() - backticks).unwrap_or("");
        is_plain(content) && update_is_plain(update, replaced)
    }
}
