//! Element type tags and per-type element state.

use std::fmt;

/// Type tag of an element. Doubles as the key of the parser that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    // Blocks
    Document,
    Section,
    Heading,
    Paragraph,
    CodeBlock,
    BlankLine,

    // Metadata
    Options,

    // Inlines
    Text,
    Emphasis,
    Strikethrough,
    CodeSpan,
    Link,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Document => "DOCUMENT",
            Self::Section => "SECTION",
            Self::Heading => "HEADING",
            Self::Paragraph => "PARAGRAPH",
            Self::CodeBlock => "CODE_BLOCK",
            Self::BlankLine => "BLANK_LINE",
            Self::Options => "OPTIONS",
            Self::Text => "TEXT",
            Self::Emphasis => "EMPHASIS",
            Self::Strikethrough => "STRIKETHROUGH",
            Self::CodeSpan => "CODE_SPAN",
            Self::Link => "LINK",
        }
    }

    /// Inline elements always live on exactly one physical line.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Emphasis | Self::Strikethrough | Self::CodeSpan | Self::Link
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fence facts of a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    pub fence_char: char,
    /// Length of the opening fence run.
    pub delimiter_length: usize,
    pub info: String,
    /// False once the closing fence has been seen.
    pub continue_with_next_line: bool,
}

/// A `{default; key=value; ...}` metadata block.
///
/// Lookups only answer once the closing brace was found; a block that was cut
/// short by an unparsable entry keeps what it collected but reports nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsBlock {
    pub(crate) default_value: Option<String>,
    pub(crate) entries: Vec<(String, String)>,
    pub(crate) closed: bool,
}

impl OptionsBlock {
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if !self.closed {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn default_value(&self) -> Option<&str> {
        if !self.closed {
            return None;
        }
        self.default_value.as_deref()
    }

    /// Entries in source order, whether or not the block was closed.
    pub fn raw_entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.default_value.is_none()
    }
}

/// Per-type state carried by an [`Element`](super::Element).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Document,
    Section {
        level: u8,
    },
    Heading {
        level: u8,
        continue_with_next_line: bool,
    },
    Paragraph,
    CodeBlock(CodeFence),
    BlankLine,
    Options(OptionsBlock),
    Text,
    Emphasis {
        delimiter: char,
        run: usize,
    },
    Strikethrough,
    CodeSpan {
        backticks: usize,
    },
    Link {
        destination: String,
    },
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Document => ElementType::Document,
            Self::Section { .. } => ElementType::Section,
            Self::Heading { .. } => ElementType::Heading,
            Self::Paragraph => ElementType::Paragraph,
            Self::CodeBlock(_) => ElementType::CodeBlock,
            Self::BlankLine => ElementType::BlankLine,
            Self::Options(_) => ElementType::Options,
            Self::Text => ElementType::Text,
            Self::Emphasis { .. } => ElementType::Emphasis,
            Self::Strikethrough => ElementType::Strikethrough,
            Self::CodeSpan { .. } => ElementType::CodeSpan,
            Self::Link { .. } => ElementType::Link,
        }
    }

    /// Section or heading level.
    pub fn level(&self) -> Option<u8> {
        match self {
            Self::Section { level } | Self::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&OptionsBlock> {
        match self {
            Self::Options(block) => Some(block),
            _ => None,
        }
    }

    pub fn code_fence(&self) -> Option<&CodeFence> {
        match self {
            Self::CodeBlock(fence) => Some(fence),
            _ => None,
        }
    }

    /// Attribute summary used by tree dumps.
    pub(crate) fn attributes(&self) -> String {
        match self {
            Self::Section { level } => format!(" level={}", level),
            Self::Heading {
                level,
                continue_with_next_line,
            } => {
                if *continue_with_next_line {
                    format!(" level={} continued", level)
                } else {
                    format!(" level={}", level)
                }
            }
            Self::CodeBlock(fence) => {
                let marker = fence.fence_char.to_string().repeat(fence.delimiter_length);
                let mut out = format!(" fence={}", marker);
                if !fence.info.is_empty() {
                    out.push_str(&format!(" info={:?}", fence.info));
                }
                if fence.continue_with_next_line {
                    out.push_str(" open");
                }
                out
            }
            Self::Options(block) => {
                let mut out = String::new();
                if let Some(default) = &block.default_value {
                    out.push_str(&format!(" default={:?}", default));
                }
                for (key, value) in &block.entries {
                    out.push_str(&format!(" {}={:?}", key, value));
                }
                if !block.closed {
                    out.push_str(" unclosed");
                }
                out
            }
            Self::Emphasis { delimiter, run } => format!(" delimiter={:?} run={}", delimiter, run),
            Self::CodeSpan { backticks } => format!(" backticks={}", backticks),
            Self::Link { destination } => format!(" destination={:?}", destination),
            Self::Document
            | Self::Paragraph
            | Self::BlankLine
            | Self::Text
            | Self::Strikethrough => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_options_answer_nothing() {
        let block = OptionsBlock {
            default_value: Some("rust".to_string()),
            entries: vec![("k".to_string(), "v".to_string())],
            closed: false,
        };
        assert_eq!(block.get("k"), None);
        assert_eq!(block.default_value(), None);
        assert_eq!(block.raw_entries().len(), 1);
    }

    #[test]
    fn later_entries_win() {
        let block = OptionsBlock {
            default_value: None,
            entries: vec![
                ("k".to_string(), "first".to_string()),
                ("k".to_string(), "second".to_string()),
            ],
            closed: true,
        };
        assert_eq!(block.get("k"), Some("second"));
        assert_eq!(block.get("missing"), None);
    }

    #[test]
    fn kind_maps_to_type() {
        assert_eq!(
            ElementKind::Heading {
                level: 2,
                continue_with_next_line: false
            }
            .element_type(),
            ElementType::Heading
        );
        assert!(ElementType::Text.is_inline());
        assert!(!ElementType::Options.is_inline());
    }
}
