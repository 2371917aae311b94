use super::helpers::{parse_blocks, parse_flat};

fn assert_round_trip(input: &str) {
    let doc = parse_blocks(input);
    assert_eq!(doc.text(), input, "document must preserve exact input");
    let doc = parse_flat(input);
    assert_eq!(doc.text(), input, "flat document must preserve exact input");
}

#[test]
fn test_losslessness_basic() {
    assert_round_trip("# H1\n\n### H3\n");
}

#[test]
fn test_losslessness_no_trailing_newline() {
    assert_round_trip("# Heading");
}

#[test]
fn test_losslessness_multiple_blank_lines() {
    assert_round_trip("\n\n\n");
}

#[test]
fn test_losslessness_paragraph() {
    assert_round_trip("First line\nSecond line\n");
}

#[test]
fn test_losslessness_mixed_terminators() {
    assert_round_trip("# Title\r\n\r\nBody *text*\rmore\nend");
}

#[test]
fn test_losslessness_inline_markup() {
    assert_round_trip("a *b* __c__ ~~d~~ `e` [f](g) \\*h\\* _i");
}

#[test]
fn test_losslessness_code_and_options() {
    assert_round_trip("{lang=rust; echo=false}\n```rust\nfn main() {}\n```\n# Done {#end}  \n");
}

#[test]
fn test_losslessness_unicode() {
    assert_round_trip("# Héllo wörld 🎉\n\n*ünïcode* and 漢字\n");
}

#[test]
fn test_empty_input() {
    let doc = parse_blocks("");
    assert!(doc.is_empty());
    assert_eq!(doc.text(), "");
}
