use crate::config::{Config, ConfigBuilder};
use crate::dialect::Dialect;
use crate::syntax::{ElementKey, ElementType, ParsedDocument};

pub fn parse_blocks(input: &str) -> ParsedDocument {
    parse_with(input, Config::default())
}

pub fn parse_with(input: &str, config: Config) -> ParsedDocument {
    Dialect::new(config)
        .parse_complete_text(input)
        .unwrap_or_else(|err| panic!("failed to parse {:?}: {}", input, err))
}

/// Default config without the section wrapper, so blocks sit directly
/// under the document.
pub fn flat() -> Config {
    ConfigBuilder::default().sections(false).build()
}

pub fn parse_flat(input: &str) -> ParsedDocument {
    parse_with(input, flat())
}

pub fn find_first(doc: &ParsedDocument, ty: ElementType) -> Option<ElementKey> {
    doc.descendants(doc.root())
        .into_iter()
        .find(|&key| doc.element(key).element_type() == ty)
}

pub fn find_all(doc: &ParsedDocument, ty: ElementType) -> Vec<ElementKey> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&key| doc.element(key).element_type() == ty)
        .collect()
}

pub fn get_blocks(doc: &ParsedDocument) -> Vec<ElementKey> {
    doc.content(doc.root())
}

pub fn kinds(doc: &ParsedDocument, keys: &[ElementKey]) -> Vec<ElementType> {
    keys.iter()
        .map(|&key| doc.element(key).element_type())
        .collect()
}

pub fn assert_block_kinds(input: &str, expected: &[ElementType]) {
    let doc = parse_flat(input);
    let actual = kinds(&doc, &get_blocks(&doc));
    assert_eq!(
        actual, expected,
        "Block kinds did not match for input:\n{}",
        input
    );
}

/// Get text of the first element of the given type
pub fn get_text(doc: &ParsedDocument, ty: ElementType) -> Option<String> {
    find_first(doc, ty).map(|key| doc.element_text(key))
}

/// Text of every line of an element, terminators excluded.
pub fn line_texts(doc: &ParsedDocument, element: ElementKey) -> Vec<String> {
    doc.element(element)
        .lines()
        .iter()
        .map(|&line| doc.as_text(line))
        .collect()
}
