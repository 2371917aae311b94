//! Paragraphs: runs of non-blank lines nothing else claims.
//!
//! The first line may open with an options block, which keeps taking lines
//! for as long as it stays unclosed.

use super::options::{create_options, scan_options};
use super::utils::is_interrupted;
use crate::parser::{
    LineSpan, ParseContext, ParseResult, Parser, adopt_single_line, parse_inline_content,
    update_is_plain,
};
use crate::syntax::{
    ContentUpdate, ElementKey, ElementKind, ElementType, LineKey, OptionsBlock, ParsedDocument,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphParser;

impl ParagraphParser {
    fn start(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if span.is_blank() {
            return Ok(None);
        }
        let paragraph = doc.create_element(ElementKind::Paragraph);
        doc.add_line(paragraph);

        let mut body = span;
        if cx.config().extensions.options_blocks
            && let Some(scan) = scan_options(span.as_str(), true, &OptionsBlock::default())?
        {
            let consumed = scan.consumed;
            let options = create_options(doc, span, scan)?;
            doc.add_content(paragraph, options)?;
            body = span.tail(consumed);
        }

        if !self.fill_inline(cx, doc, paragraph, body)? {
            return Ok(None);
        }
        Ok(Some(paragraph))
    }

    fn extend(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        paragraph: ElementKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<ElementKey>> {
        if span.is_blank() || is_interrupted(cx, span)? {
            return Ok(None);
        }
        doc.add_line(paragraph);

        let mut body = span;
        if let Some(options) = doc.last_child(paragraph)
            && doc.element(options).element_type() == ElementType::Options
            && !doc.element(options).is_fully_parsed()
        {
            let parser = cx.parser(ElementType::Options);
            match parser.parse_line(cx, doc, Some(options), span)? {
                Some(options) => {
                    doc.add_content(paragraph, options)?;
                    let consumed = doc
                        .element(options)
                        .lines()
                        .last()
                        .map_or(0, |&line| doc.node_len(line));
                    body = span.tail(consumed);
                }
                None => doc.element_mut(options).is_fully_parsed = true,
            }
        }

        if !self.fill_inline(cx, doc, paragraph, body)? {
            doc.pop_line(paragraph);
            return Ok(None);
        }
        Ok(Some(paragraph))
    }

    fn fill_inline(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        paragraph: ElementKey,
        body: LineSpan<'_>,
    ) -> ParseResult<bool> {
        if body.is_empty() {
            return Ok(true);
        }
        parse_inline_content(cx, doc, paragraph, body)
    }

    fn carries_options(doc: &ParsedDocument, line: LineKey) -> bool {
        doc.node(line)
            .children()
            .iter()
            .any(|&child| {
                doc.element(doc.node(child).belongs_to()).element_type() == ElementType::Options
            })
    }
}

impl Parser for ParagraphParser {
    fn element_type(&self) -> ElementType {
        ElementType::Paragraph
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
            Some(paragraph) => self.extend(cx, doc, paragraph, span),
        }
    }

    fn parse_line_update(
        &self,
        cx: &ParseContext<'_>,
        doc: &mut ParsedDocument,
        original: ElementKey,
        line: LineKey,
        span: LineSpan<'_>,
    ) -> ParseResult<Option<LineKey>> {
        if Self::carries_options(doc, line) {
            log::debug!("Paragraph line with options needs a reparse");
            return Ok(None);
        }
        if span.is_blank() || is_interrupted(cx, span)? {
            return Ok(None);
        }
        if cx.config().extensions.options_blocks && span.as_str().starts_with('{') {
            return Ok(None);
        }
        let fresh = doc.create_element(ElementKind::Paragraph);
        doc.add_line(fresh);
        if !parse_inline_content(cx, doc, fresh, span)? {
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
        update_is_plain(update, replaced)
    }
}
