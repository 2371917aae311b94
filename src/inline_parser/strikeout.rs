//! Strike-through (`~~text~~`).
//!
//! Exactly two tildes on each side, flanking like emphasis runs.

use super::emphasis::{build_delimited, find_closer, is_left_flanking, run_length};
use crate::parser::{LineSpan, ParseContext, ParseResult, Parser, update_keeps_delimiters};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, ParsedDocument};

const TILDES: usize = 2;

#[derive(Debug, Default, Clone, Copy)]
pub struct StrikethroughParser;

impl Parser for StrikethroughParser {
    fn element_type(&self) -> ElementType {
        ElementType::Strikethrough
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
        if run_length(span.as_str(), '~') != TILDES || !is_left_flanking(&span, 0, TILDES) {
            return Ok(None);
        }
        let Some(close) = find_closer(&span, '~', TILDES, true)? else {
            return Ok(None);
        };
        build_delimited(cx, doc, ElementKind::Strikethrough, span, TILDES, close)
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
