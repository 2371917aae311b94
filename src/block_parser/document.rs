use crate::parser::{LineSpan, ParseContext, ParseResult, Parser, parse_block};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, LineKey, ParsedDocument};

/// The root container. Never closes and never takes a line-level update.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl Parser for DocumentParser {
    fn element_type(&self) -> ElementType {
        ElementType::Document
    }

    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        parse_block(
            cx,
            doc,
            previous,
            span,
            |doc| doc.create_element(ElementKind::Document),
            cx.registry().block_order(),
            |_, _, _| false,
        )
    }

    fn parse_line_update(
        &self,
        _cx: &ParseContext<'_>,
        _doc: &mut ParsedDocument,
        _original: ElementKey,
        _line: LineKey,
        _span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        Ok(None)
    }

    fn can_update(
        &self,
        _cx: &ParseContext<'_>,
        _doc: &ParsedDocument,
        _original: ElementKey,
        _update: &ContentUpdate,
        _replaced: &str,
    ) -> bool {
        false
    }
}
