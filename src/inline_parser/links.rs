//! Inline links: `[text](destination)`.

use crate::parser::{
    LineSpan, ParseContext, ParseResult, Parser, parse_inline_content, update_keeps_delimiters,
};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct LinkParser;

/// Try to parse an inline link.
/// Returns (total_len, link_text, destination) if successful.
pub(crate) fn try_parse_inline_link(text: &str) -> Option<(usize, &str, &str)> {
    if !text.starts_with('[') {
        return None;
    }

    // Find the closing ]
    let mut bracket_depth = 0;
    let mut escape_next = false;
    let mut close_bracket_pos = None;

    for (i, ch) in text[1..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '[' => bracket_depth += 1,
            ']' => {
                if bracket_depth == 0 {
                    close_bracket_pos = Some(i + 1);
                    break;
                }
                bracket_depth -= 1;
            }
            _ => {}
        }
    }

    let close_bracket = close_bracket_pos?;
    let link_text = &text[1..close_bracket];

    // Check for immediate ( after ]
    let after_bracket = close_bracket + 1;
    if !text[after_bracket..].starts_with('(') {
        return None;
    }

    // Find closing ) for destination
    let dest_start = after_bracket + 1;
    let remaining = &text[dest_start..];

    let mut paren_depth = 0;
    let mut escape_next = false;
    let mut in_quotes = false;
    let mut close_paren_pos = None;

    for (i, ch) in remaining.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => paren_depth += 1,
            ')' if !in_quotes => {
                if paren_depth == 0 {
                    close_paren_pos = Some(i);
                    break;
                }
                paren_depth -= 1;
            }
            _ => {}
        }
    }

    let close_paren = close_paren_pos?;
    let dest_content = &remaining[..close_paren];

    // Total length: [ + text + ] + ( + dest + )
    let total_len = dest_start + close_paren + 1;

    Some((total_len, link_text, dest_content))
}

impl Parser for LinkParser {
    fn element_type(&self) -> ElementType {
        ElementType::Link
    }

    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if previous.is_some() || cx.in_link() || cx.depth() >= cx.config().max_inline_depth {
            return Ok(None);
        }
        let text = span.as_str();
        let Some((total_len, link_text, destination)) = try_parse_inline_link(text) else {
            return Ok(None);
        };
        let text_end = 1 + link_text.len();

        let link = doc.create_element(ElementKind::Link {
            destination: destination.to_string(),
        });
        doc.add_line(link);
        doc.add_literal(link, "[", span.start())?;
        if !link_text.is_empty()
            && !parse_inline_content(&cx.inside_link(), doc, link, span.sub(1, text_end))?
        {
            return Ok(None);
        }
        doc.add_literal(link, &text[text_end..total_len], span.start() + text_end)?;
        doc.element_mut(link).is_fully_parsed = true;
        log::trace!("Link to {:?} at {}", destination, span.start());
        Ok(Some(link))
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
    fn simple_link() {
        assert_eq!(
            try_parse_inline_link("[text](https://example.com) after"),
            Some((27, "text", "https://example.com"))
        );
    }

    #[test]
    fn nested_brackets_in_text() {
        assert_eq!(
            try_parse_inline_link("[a [b] c](u)"),
            Some((12, "a [b] c", "u"))
        );
    }

    #[test]
    fn needs_destination() {
        assert_eq!(try_parse_inline_link("[text] (u)"), None);
        assert_eq!(try_parse_inline_link("[text]"), None);
        assert_eq!(try_parse_inline_link("[text](unclosed"), None);
    }

    #[test]
    fn parenthesised_destination() {
        assert_eq!(
            try_parse_inline_link("[x](a_(b))"),
            Some((10, "x", "a_(b)"))
        );
    }
}
