//! Debug rendering of the element tree.

use super::kind::ElementType;
use super::tree::{ElementKey, ParsedDocument};

impl ParsedDocument {
    /// Indented `TYPE@start..end attrs "text"` tree, one element per line.
    ///
    /// Options blocks are included. Leaf-like elements also print their
    /// source text. Two documents with equal dumps have the same structure
    /// and positions, which is what incremental-vs-full comparisons rely on.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_element(self.root(), 0, &mut out);
        out
    }

    fn dump_element(&self, key: ElementKey, depth: usize, out: &mut String) {
        let element = self.element(key);
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(element.element_type().name());
        if let Some(range) = self.element_range(key) {
            out.push_str(&format!("@{}..{}", range.start, range.end));
        }
        out.push_str(&element.kind().attributes());
        if shows_text(element.element_type()) {
            out.push_str(&format!(" {:?}", self.element_text(key)));
        }
        out.push('\n');

        for child in self.children_with_metadata(key) {
            self.dump_element(child, depth + 1, out);
        }
    }
}

fn shows_text(ty: ElementType) -> bool {
    matches!(
        ty,
        ElementType::Text | ElementType::CodeSpan | ElementType::BlankLine | ElementType::CodeBlock
    )
}
