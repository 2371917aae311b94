//! Fixed set of parser singletons and the precedence orders over them.

use super::Parser;
use crate::block_parser::{
    BlankLineParser, CodeBlockParser, DocumentParser, HeadingParser, OptionsParser,
    ParagraphParser, SectionParser,
};
use crate::config::Config;
use crate::inline_parser::{
    CodeSpanParser, EmphasisParser, LinkParser, StrikethroughParser, TextParser,
};
use crate::syntax::ElementType;

/// Every grammar of the dialect, addressed by [`ElementType`].
///
/// Parsers refer to each other cyclically (sections start from headings,
/// paragraphs ask headings whether they interrupt), so they never hold
/// references to one another. All slots are allocated first and the
/// precedence orders are wired afterwards; parsers reach their peers through
/// the registry at call time.
#[derive(Debug)]
pub struct Registry {
    config: Config,

    document: DocumentParser,
    section: SectionParser,
    heading: HeadingParser,
    paragraph: ParagraphParser,
    code_block: CodeBlockParser,
    blank_line: BlankLineParser,
    options: OptionsParser,

    text: TextParser,
    emphasis: EmphasisParser,
    strikethrough: StrikethroughParser,
    code_span: CodeSpanParser,
    link: LinkParser,

    block_order: Vec<ElementType>,
    interrupters: Vec<ElementType>,
    inline_order: Vec<ElementType>,
    link_text_order: Vec<ElementType>,
}

impl Registry {
    pub fn new(config: Config) -> Self {
        let mut registry = Self::allocate(config);
        registry.wire();
        registry
    }

    fn allocate(config: Config) -> Self {
        Self {
            config,
            document: DocumentParser,
            section: SectionParser,
            heading: HeadingParser,
            paragraph: ParagraphParser,
            code_block: CodeBlockParser,
            blank_line: BlankLineParser,
            options: OptionsParser,
            text: TextParser,
            emphasis: EmphasisParser,
            strikethrough: StrikethroughParser,
            code_span: CodeSpanParser,
            link: LinkParser,
            block_order: Vec::new(),
            interrupters: Vec::new(),
            inline_order: Vec::new(),
            link_text_order: Vec::new(),
        }
    }

    fn wire(&mut self) {
        let ext = &self.config.extensions;

        let mut blocks = Vec::new();
        blocks.push(if ext.sections {
            ElementType::Section
        } else {
            ElementType::Heading
        });
        if ext.fenced_code_blocks {
            blocks.push(ElementType::CodeBlock);
        }
        blocks.push(ElementType::BlankLine);
        blocks.push(ElementType::Paragraph);

        let mut interrupters = vec![ElementType::Heading];
        if ext.fenced_code_blocks {
            interrupters.push(ElementType::CodeBlock);
        }
        interrupters.push(ElementType::BlankLine);

        let mut inlines = Vec::new();
        if ext.code_spans {
            inlines.push(ElementType::CodeSpan);
        }
        if ext.inline_links {
            inlines.push(ElementType::Link);
        }
        inlines.push(ElementType::Emphasis);
        if ext.strikeout {
            inlines.push(ElementType::Strikethrough);
        }
        inlines.push(ElementType::Text);

        let link_text = inlines
            .iter()
            .copied()
            .filter(|&ty| ty != ElementType::Link)
            .collect();

        log::debug!("Block order: {:?}", blocks);
        log::debug!("Inline order: {:?}", inlines);

        self.block_order = blocks;
        self.interrupters = interrupters;
        self.inline_order = inlines;
        self.link_text_order = link_text;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get(&self, ty: ElementType) -> &dyn Parser {
        match ty {
            ElementType::Document => &self.document,
            ElementType::Section => &self.section,
            ElementType::Heading => &self.heading,
            ElementType::Paragraph => &self.paragraph,
            ElementType::CodeBlock => &self.code_block,
            ElementType::BlankLine => &self.blank_line,
            ElementType::Options => &self.options,
            ElementType::Text => &self.text,
            ElementType::Emphasis => &self.emphasis,
            ElementType::Strikethrough => &self.strikethrough,
            ElementType::CodeSpan => &self.code_span,
            ElementType::Link => &self.link,
        }
    }

    /// Block grammars for document and section bodies.
    pub fn block_order(&self) -> &[ElementType] {
        &self.block_order
    }

    /// Grammars that end a paragraph or heading continuation.
    pub fn interrupters(&self) -> &[ElementType] {
        &self.interrupters
    }

    pub fn inline_order(&self) -> &[ElementType] {
        &self.inline_order
    }

    /// Inline order inside link text: everything except links.
    pub fn link_text_order(&self) -> &[ElementType] {
        &self.link_text_order
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn default_orders() {
        let registry = Registry::default();
        assert_eq!(
            registry.block_order(),
            &[
                ElementType::Section,
                ElementType::CodeBlock,
                ElementType::BlankLine,
                ElementType::Paragraph
            ]
        );
        assert_eq!(
            registry.inline_order(),
            &[
                ElementType::CodeSpan,
                ElementType::Link,
                ElementType::Emphasis,
                ElementType::Strikethrough,
                ElementType::Text
            ]
        );
        assert!(!registry.link_text_order().contains(&ElementType::Link));
    }

    #[test]
    fn every_slot_reports_its_type() {
        let registry = Registry::default();
        for ty in [
            ElementType::Document,
            ElementType::Section,
            ElementType::Heading,
            ElementType::Paragraph,
            ElementType::CodeBlock,
            ElementType::BlankLine,
            ElementType::Options,
            ElementType::Text,
            ElementType::Emphasis,
            ElementType::Strikethrough,
            ElementType::CodeSpan,
            ElementType::Link,
        ] {
            assert_eq!(registry.get(ty).element_type(), ty);
        }
    }

    #[test]
    fn disabled_extensions_leave_the_orders() {
        let config = ConfigBuilder::default()
            .sections(false)
            .fenced_code_blocks(false)
            .strikeout(false)
            .build();
        let registry = Registry::new(config);
        assert_eq!(registry.block_order()[0], ElementType::Heading);
        assert!(!registry.block_order().contains(&ElementType::CodeBlock));
        assert!(!registry.interrupters().contains(&ElementType::CodeBlock));
        assert!(!registry.inline_order().contains(&ElementType::Strikethrough));
    }
}
