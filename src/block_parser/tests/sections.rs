use super::helpers::{find_first, get_blocks, kinds, parse_blocks};
use crate::syntax::{ElementKey, ElementType, ParsedDocument};

fn level(doc: &ParsedDocument, key: ElementKey) -> Option<u8> {
    doc.element(key).kind().level()
}

#[test]
fn nested_headings_open_nested_sections() {
    let doc = parse_blocks("# foo\n## foo\n### foo");
    let blocks = get_blocks(&doc);
    assert_eq!(kinds(&doc, &blocks), vec![ElementType::Section]);

    let mut section = blocks[0];
    for expected in 1..=3 {
        assert_eq!(level(&doc, section), Some(expected));
        let content = doc.content(section);
        let heading = content[0];
        assert_eq!(doc.element(heading).element_type(), ElementType::Heading);
        assert_eq!(level(&doc, heading), Some(expected));

        let text = doc.content(heading);
        assert_eq!(text.len(), 1);
        assert_eq!(doc.element_text(text[0]), "foo");

        if expected < 3 {
            assert_eq!(content.len(), 2);
            section = content[1];
        } else {
            assert_eq!(content.len(), 1);
        }
    }
}

#[test]
fn same_level_heading_closes_section() {
    let doc = parse_blocks("# a\ntext\n# b\nmore");
    let blocks = get_blocks(&doc);
    assert_eq!(
        kinds(&doc, &blocks),
        vec![ElementType::Section, ElementType::Section]
    );
    for &section in &blocks {
        assert_eq!(
            kinds(&doc, &doc.content(section)),
            vec![ElementType::Heading, ElementType::Paragraph]
        );
    }
}

#[test]
fn higher_level_heading_closes_every_deeper_section() {
    let doc = parse_blocks("# a\n## b\n### c\n# d");
    let blocks = get_blocks(&doc);
    assert_eq!(blocks.len(), 2);
    assert_eq!(doc.element_text(blocks[0]), "# a\n## b\n### c");
    assert_eq!(doc.element_text(blocks[1]), "# d");
}

#[test]
fn skipped_levels_still_nest() {
    let doc = parse_blocks("# a\n### b\n## c");
    let top = get_blocks(&doc)[0];
    let content = doc.content(top);
    assert_eq!(
        kinds(&doc, &content),
        vec![ElementType::Heading, ElementType::Section, ElementType::Section]
    );
    assert_eq!(level(&doc, content[1]), Some(3));
    assert_eq!(level(&doc, content[2]), Some(2));
}

#[test]
fn text_before_first_heading_stays_at_top_level() {
    let doc = parse_blocks("intro\n\n# a\nbody");
    assert_eq!(
        kinds(&doc, &get_blocks(&doc)),
        vec![
            ElementType::Paragraph,
            ElementType::BlankLine,
            ElementType::Section
        ]
    );
}

#[test]
fn section_spans_blank_lines_and_code() {
    let doc = parse_blocks("# a\n\n```\n# not a heading\n```\n");
    let section = find_first(&doc, ElementType::Section).unwrap();
    assert_eq!(
        kinds(&doc, &doc.content(section)),
        vec![
            ElementType::Heading,
            ElementType::BlankLine,
            ElementType::CodeBlock,
            ElementType::BlankLine
        ]
    );
    assert_eq!(doc.element(section).lines().len(), 6);
}
