//! ATX headings.
//!
//! A heading whose line ends in exactly two spaces takes the next line as
//! well, unless that line is blank or starts another block. Only the first
//! line may end in an options block.

use super::options::{create_options, trailing_options};
use super::utils::{ends_with_hard_break, is_interrupted};
use crate::parser::{
    InternalError, LineSpan, ParseContext, ParseResult, Parser, adopt_single_line,
    parse_inline_content,
};
use crate::syntax::{ElementKey, ElementKind, ElementType, LineKey, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingParser;

/// Try to parse an ATX heading from content, returns heading level (1-6) if found.
pub(crate) fn try_parse_atx_heading(content: &str) -> Option<usize> {
    let trimmed = content.trim_start();

    // Must start with 1-6 # characters
    let hash_count = trimmed.chars().take_while(|&c| c == '#').count();
    if hash_count == 0 || hash_count > 6 {
        return None;
    }

    // After hashes, must be end of line, space, or tab
    let after_hashes = &trimmed[hash_count..];
    if !after_hashes.is_empty() && !after_hashes.starts_with(' ') && !after_hashes.starts_with('\t')
    {
        return None;
    }

    // Check leading spaces (max 3)
    let leading_spaces = content.len() - trimmed.len();
    if leading_spaces > 3 {
        return None;
    }

    Some(hash_count)
}

fn continues(cx: &ParseContext<'_>, line: &str) -> bool {
    cx.config().extensions.heading_continuation && ends_with_hard_break(line)
}

fn heading_state(doc: &ParsedDocument, heading: ElementKey) -> ParseResult<(u8, bool)> {
    match doc.element(heading).kind() {
        ElementKind::Heading {
            level,
            continue_with_next_line,
        } => Ok((*level, *continue_with_next_line)),
        other => Err(InternalError::invariant(format!(
            "heading parser handed a {}",
            other.element_type()
        ))),
    }
}

/// Inline text of one heading line, plus the trailing options block when
/// `allow_options` is set.
fn parse_heading_body(
    cx: &ParseContext<'_>,
    doc: &mut ParsedDocument,
    heading: ElementKey,
    body: LineSpan<'_>,
    allow_options: bool,
) -> ParseResult<bool> {
    let mut inline = body;
    let mut trailing = None;
    if allow_options
        && cx.config().extensions.options_blocks
        && let Some((at, scan)) = trailing_options(body.as_str())?
    {
        inline = body.head(at);
        trailing = Some((at, scan));
    }

    if !inline.is_empty() && !parse_inline_content(cx, doc, heading, inline)? {
        return Ok(false);
    }

    if let Some((at, scan)) = trailing {
        let end = at + scan.consumed;
        let options = create_options(doc, body.tail(at), scan)?;
        doc.add_content(heading, options)?;
        let rest = body.tail(end);
        if !rest.is_empty() {
            doc.add_literal(heading, rest.as_str(), rest.start())?;
        }
    }
    Ok(true)
}

impl HeadingParser {
    fn start(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        let text = span.as_str();
        let Some(level) = try_parse_atx_heading(text) else {
            return Ok(None);
        };

        let indent = text.len() - text.trim_start().len();
        let mut marker_end = indent + level;
        if matches!(text[marker_end..].chars().next(), Some(' ' | '\t')) {
            marker_end += 1;
        }

        let continue_with_next_line = continues(cx, text);
        let heading = doc.create_element(ElementKind::Heading {
            level: level as u8,
            continue_with_next_line,
        });
        doc.add_line(heading);
        doc.add_literal(heading, &text[..marker_end], span.start())?;
        if !parse_heading_body(cx, doc, heading, span.tail(marker_end), true)? {
            return Ok(None);
        }
        doc.element_mut(heading).is_fully_parsed = !continue_with_next_line;
        log::debug!("Parsed level {} heading at {}", level, span.start());
        Ok(Some(heading))
    }

    fn extend(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        heading: ElementKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        let (level, open) = heading_state(doc, heading)?;
        if !open || span.is_blank() || is_interrupted(cx, span)? {
            return Ok(None);
        }

        doc.add_line(heading);
        if !parse_heading_body(cx, doc, heading, span, false)? {
            doc.pop_line(heading);
            return Ok(None);
        }
        let continue_with_next_line = continues(cx, span.as_str());
        let element = doc.element_mut(heading);
        element.kind = ElementKind::Heading {
            level,
            continue_with_next_line,
        };
        element.is_fully_parsed = !continue_with_next_line;
        Ok(Some(heading))
    }
}

impl Parser for HeadingParser {
    fn element_type(&self) -> ElementType {
        ElementType::Heading
    }

    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        match previous {
            None => self.start(cx, doc, span),
            Some(heading) => self.extend(cx, doc, heading, span),
        }
    }

    /// Rejects edits that would change the level, or change whether a line
    /// pulls in the next one.
    fn parse_line_update(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        original: ElementKey,
        line: LineKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        let (level, open) = heading_state(doc, original)?;
        let lines = doc.element(original).lines();
        let Some(index) = lines.iter().position(|&l| l == line) else {
            return Err(InternalError::invariant("heading line vanished during update"));
        };
        let expected = if index + 1 == lines.len() { open } else { true };
        if continues(cx, span.as_str()) != expected {
            log::debug!("Heading continuation would change, needs a reparse");
            return Ok(None);
        }

        let fresh = if index == 0 {
            let Some(fresh) = self.start(cx, doc, span)? else {
                return Ok(None);
            };
            if doc.element(fresh).kind().level() != Some(level) {
                log::debug!("Heading level would change, needs a reparse");
                return Ok(None);
            }
            fresh
        } else {
            if span.is_blank() || is_interrupted(cx, span)? {
                return Ok(None);
            }
            let fresh = doc.create_element(ElementKind::Heading {
                level,
                continue_with_next_line: open,
            });
            doc.add_line(fresh);
            if !parse_heading_body(cx, doc, fresh, span, false)? {
                return Ok(None);
            }
            fresh
        };

        let replacement = adopt_single_line(doc, fresh, original, span)?;
        doc.element_mut(original).kind = ElementKind::Heading {
            level,
            continue_with_next_line: open,
        };
        Ok(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_levels() {
        assert_eq!(try_parse_atx_heading("# Heading"), Some(1));
        assert_eq!(try_parse_atx_heading("###### Six"), Some(6));
        assert_eq!(try_parse_atx_heading("####### Seven"), None);
        assert_eq!(try_parse_atx_heading("#"), Some(1));
        assert_eq!(try_parse_atx_heading("#NoSpace"), None);
        assert_eq!(try_parse_atx_heading("   ## indented"), Some(2));
        assert_eq!(try_parse_atx_heading("    # too far"), None);
    }
}
