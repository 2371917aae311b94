//! Document-scoped id generation.

const ELEMENT_PREFIX: char = 'e';
const LINE_PREFIX: char = 'l';

/// Hands out ids that are unique within one document instance.
///
/// Element ids and line ids share one monotonic counter but carry different
/// prefixes, so a line id can never be mistaken for an element id. Two
/// documents may hand out the same ids; nothing relies on cross-document
/// uniqueness.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for an [`Element`](super::Element).
    pub fn element_id(&mut self) -> String {
        format!("{}{}", ELEMENT_PREFIX, self.bump())
    }

    /// Next id for a [`ParsedLine`](super::ParsedLine).
    pub fn line_id(&mut self) -> String {
        format!("{}{}", LINE_PREFIX, self.bump())
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }

    pub fn is_element_id(id: &str) -> bool {
        has_prefix(id, ELEMENT_PREFIX)
    }

    pub fn is_line_id(id: &str) -> bool {
        has_prefix(id, LINE_PREFIX)
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

fn has_prefix(id: &str, prefix: char) -> bool {
    let mut chars = id.chars();
    chars.next() == Some(prefix) && {
        let rest = chars.as_str();
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
    }
}
