//! Outline sections.
//!
//! A section starts with a heading and takes every following block until a
//! heading of the same or a higher level (numerically lower or equal) shows
//! up. Nested headings open nested sections.

use crate::parser::{LineSpan, ParseContext, ParseResult, Parser, parse_block};
use crate::syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, LineKey, ParsedDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct SectionParser;

fn closes_section(doc: &ParsedDocument, section: ElementKey, child: ElementKey) -> bool {
    match (doc.element(section).kind(), doc.element(child).kind()) {
        (ElementKind::Section { level }, ElementKind::Section { level: next }) => next <= level,
        _ => false,
    }
}

impl Parser for SectionParser {
    fn element_type(&self) -> ElementType {
        ElementType::Section
    }

    fn parse_line(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        previous: Option<ElementKey>,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        let Some(section) = previous else {
            let heading_parser = cx.parser(ElementType::Heading);
            let Some(heading) = heading_parser.parse_line(cx, doc, None, span)? else {
                return Ok(None);
            };
            let level = doc.element(heading).kind().level().unwrap_or(1);
            let section = doc.create_element(ElementKind::Section { level });
            doc.add_line(section);
            doc.add_content(section, heading)?;
            log::debug!("Opened level {} section at {}", level, span.start());
            return Ok(Some(section));
        };

        let level = doc.element(section).kind().level().unwrap_or(1);
        parse_block(
            cx,
            doc,
            Some(section),
            span,
            |doc| doc.create_element(ElementKind::Section { level }),
            cx.registry().block_order(),
            closes_section,
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
