//! Fenced code blocks.

use super::utils::{get_fence_count, strip_leading_spaces};
use crate::parser::{LineSpan, ParseContext, ParseResult, Parser, adopt_single_line};
use crate::syntax::{CodeFence, ElementKey, ElementKind, ElementType, LineKey, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct CodeBlockParser;

/// Opening fence: returns (fence char, run length, info string).
pub(crate) fn try_parse_fence_open(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = strip_leading_spaces(line);
    if trimmed.starts_with(' ') {
        return None;
    }

    let (fence_char, fence_count) = if let Some(count) = get_fence_count(trimmed, '`') {
        ('`', count)
    } else if let Some(count) = get_fence_count(trimmed, '~') {
        ('~', count)
    } else {
        return None;
    };

    // Must have at least 3 fence characters
    if fence_count < 3 {
        return None;
    }

    let info = trimmed[fence_count..].trim();
    // A backtick in the info string would make this an inline code span
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some((fence_char, fence_count, info))
}

pub(crate) fn is_closing_fence(line: &str, fence: &CodeFence) -> bool {
    let trimmed = strip_leading_spaces(line);
    match get_fence_count(trimmed, fence.fence_char) {
        Some(count) if count >= fence.delimiter_length => trimmed[count..].trim().is_empty(),
        _ => false,
    }
}

fn fence_of(doc: &ParsedDocument, block: ElementKey) -> Option<CodeFence> {
    doc.element(block).kind().code_fence().cloned()
}

impl Parser for CodeBlockParser {
    fn element_type(&self) -> ElementType {
        ElementType::CodeBlock
    }

    fn parse_line(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        let Some(block) = previous else {
            let Some((fence_char, delimiter_length, info)) = try_parse_fence_open(span.as_str())
            else {
                return Ok(None);
            };
            log::debug!(
                "Opening {}x{} fence at {}",
                delimiter_length,
                fence_char,
                span.start()
            );
            let block = doc.create_element(ElementKind::CodeBlock(CodeFence {
                fence_char,
                delimiter_length,
                info: info.to_string(),
                continue_with_next_line: true,
            }));
            doc.add_line(block);
            doc.add_literal(block, span.as_str(), span.start())?;
            return Ok(Some(block));
        };

        let Some(mut fence) = fence_of(doc, block) else {
            return Ok(None);
        };
        if !fence.continue_with_next_line {
            return Ok(None);
        }
        doc.add_line(block);
        doc.add_literal(block, span.as_str(), span.start())?;
        if is_closing_fence(span.as_str(), &fence) {
            log::debug!("Closing fence at {}", span.start());
            fence.continue_with_next_line = false;
            let element = doc.element_mut(block);
            element.kind = ElementKind::CodeBlock(fence);
            element.is_fully_parsed = true;
        }
        Ok(Some(block))
    }

    /// Content lines are replaced verbatim. Fence lines, and edits that turn
    /// a content line into a closing fence, need a reparse.
    fn parse_line_update(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        original: ElementKey,
        line: LineKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        let Some(fence) = fence_of(doc, original) else {
            return Ok(None);
        };
        let lines = doc.element(original).lines();
        let Some(index) = lines.iter().position(|&l| l == line) else {
            return Ok(None);
        };
        let is_closing_line = !fence.continue_with_next_line && index + 1 == lines.len();
        if index == 0 || is_closing_line || is_closing_fence(span.as_str(), &fence) {
            return Ok(None);
        }

        let fresh = doc.create_element(ElementKind::CodeBlock(fence));
        doc.add_line(fresh);
        doc.add_literal(fresh, span.as_str(), span.start())?;
        adopt_single_line(doc, fresh, original, span)
    }
}
