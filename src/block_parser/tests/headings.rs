use super::helpers::{
    assert_block_kinds, find_all, find_first, get_blocks, kinds, line_texts, parse_blocks,
    parse_flat, parse_with,
};
use crate::config::ConfigBuilder;
use crate::syntax::{ElementKind, ElementType};

#[test]
fn atx_heading_levels() {
    let doc = parse_flat("# One\n## Two\n###### Six");
    let levels: Vec<_> = get_blocks(&doc)
        .into_iter()
        .map(|key| doc.element(key).kind().level())
        .collect();
    assert_eq!(levels, vec![Some(1), Some(2), Some(6)]);
}

#[test]
fn heading_content_excludes_marker() {
    let doc = parse_flat("## Title here");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    let content = doc.content(heading);
    assert_eq!(kinds(&doc, &content), vec![ElementType::Text]);
    assert_eq!(doc.element_text(content[0]), "Title here");
}

#[test]
fn marker_without_space_is_a_paragraph() {
    assert_block_kinds("#hashtag", &[ElementType::Paragraph]);
    assert_block_kinds("####### seven", &[ElementType::Paragraph]);
}

#[test]
fn empty_heading() {
    let doc = parse_flat("#");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert!(doc.content(heading).is_empty());
    assert_eq!(doc.element_text(heading), "#");
}

#[test]
fn heading_with_inline_markup() {
    let doc = parse_flat("# The *big* day");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(
        kinds(&doc, &doc.content(heading)),
        vec![ElementType::Text, ElementType::Emphasis, ElementType::Text]
    );
}

#[test]
fn single_line_heading_is_finished() {
    let doc = parse_flat("# foo\nbar");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    let element = doc.element(heading);
    assert!(element.is_fully_parsed());
    assert_eq!(
        element.kind(),
        &ElementKind::Heading {
            level: 1,
            continue_with_next_line: false
        }
    );
    assert_eq!(
        kinds(&doc, &get_blocks(&doc)),
        vec![ElementType::Heading, ElementType::Paragraph]
    );
}

#[test]
fn two_trailing_spaces_continue_the_heading() {
    let doc = parse_flat("# foo  \nbar\nbaz");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(line_texts(&doc, heading), vec!["# foo  ", "bar"]);
    assert_eq!(doc.element_text(heading), "# foo  \nbar");
    assert_eq!(
        doc.element(heading).kind(),
        &ElementKind::Heading {
            level: 1,
            continue_with_next_line: false
        }
    );
    assert_eq!(
        kinds(&doc, &get_blocks(&doc)),
        vec![ElementType::Heading, ElementType::Paragraph]
    );
}

#[test]
fn continuation_chains_while_lines_end_in_two_spaces() {
    let doc = parse_flat("# a  \nb  \nc\nd");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(line_texts(&doc, heading), vec!["# a  ", "b  ", "c"]);
}

#[test]
fn three_trailing_spaces_do_not_continue() {
    let doc = parse_flat("# foo   \nbar");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.element(heading).lines().len(), 1);
}

#[test]
fn continuation_stops_at_blank_line_and_other_blocks() {
    let doc = parse_flat("# foo  \n\nbar");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.element(heading).lines().len(), 1);
    assert!(doc.element(heading).is_fully_parsed());

    let doc = parse_flat("# foo  \n## bar");
    assert_eq!(find_all(&doc, ElementType::Heading).len(), 2);

    let doc = parse_flat("# foo  \n```\ncode\n```");
    assert_eq!(
        kinds(&doc, &get_blocks(&doc)),
        vec![ElementType::Heading, ElementType::CodeBlock]
    );
}

#[test]
fn continuation_can_be_disabled() {
    let config = ConfigBuilder::default()
        .sections(false)
        .heading_continuation(false)
        .build();
    let doc = parse_with("# foo  \nbar", config);
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.element(heading).lines().len(), 1);
    assert!(doc.element(heading).is_fully_parsed());
}

#[test]
fn trailing_options_belong_to_the_heading() {
    let doc = parse_blocks("# Title {#intro; level=2}");
    let section = find_first(&doc, ElementType::Section).unwrap();
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.options_of(section), None);

    let options = doc.options_of(heading).unwrap();
    let block = doc.element(options).kind().options().unwrap();
    assert_eq!(block.default_value(), Some("#intro"));
    assert_eq!(block.get("level"), Some("2"));

    let content = doc.content(heading);
    assert_eq!(kinds(&doc, &content), vec![ElementType::Text]);
    assert_eq!(doc.element_text(content[0]), "Title ");
}

#[test]
fn options_followed_by_text_stay_inline() {
    let doc = parse_flat("# Title {x} more");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.options_of(heading), None);
    assert_eq!(doc.element_text(heading), "# Title {x} more");
}

#[test]
fn indented_heading() {
    let doc = parse_flat("   ### Three");
    let heading = find_first(&doc, ElementType::Heading).unwrap();
    assert_eq!(doc.element(heading).kind().level(), Some(3));
    assert_block_kinds("    # code-ish", &[ElementType::Paragraph]);
}
