use crate::parser::{LineSpan, ParseContext, ParseResult, Parser};
use crate::syntax::{ElementKey, ElementKind, ElementType, ParsedDocument};

/// A whitespace-only line. Each blank line is its own element.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankLineParser;

impl Parser for BlankLineParser {
    fn element_type(&self) -> ElementType {
        ElementType::BlankLine
    }

    fn parse_line(
        &self,
        _cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if previous.is_some() || !span.is_blank() {
            return Ok(None);
        }
        let blank = doc.create_element(ElementKind::BlankLine);
        doc.add_line(blank);
        doc.add_literal(blank, span.as_str(), span.start())?;
        doc.element_mut(blank).is_fully_parsed = true;
        Ok(Some(blank))
    }
}
