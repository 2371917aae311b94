//! Nodes of the line-anchored content tree.

use super::tree::ElementKey;

pub type LineKey = id_arena::Id<LineContent>;

/// A node in the per-line content tree.
///
/// Offsets index the *current* document text. Composite nodes derive their
/// position from their first and last child, so only literals store one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Text(TextRun),
    Line(ParsedLine),
}

/// An immutable run of literal source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub(crate) text: String,
    pub(crate) start: usize,
    pub(crate) belongs_to: ElementKey,
}

impl TextRun {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One physical line of an element: an ordered list of child content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub(crate) id: String,
    pub(crate) children: Vec<LineKey>,
    pub(crate) belongs_to: ElementKey,
}

impl ParsedLine {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[LineKey] {
        &self.children
    }
}

impl LineContent {
    /// The element this node belongs to. Non-owning.
    pub fn belongs_to(&self) -> ElementKey {
        match self {
            Self::Text(run) => run.belongs_to,
            Self::Line(line) => line.belongs_to,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    pub fn children(&self) -> &[LineKey] {
        match self {
            Self::Text(_) => &[],
            Self::Line(line) => &line.children,
        }
    }

    pub fn as_parsed_line(&self) -> Option<&ParsedLine> {
        match self {
            Self::Line(line) => Some(line),
            Self::Text(_) => None,
        }
    }
}

/// The terminator that ended a physical line in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    Lf,
    CrLf,
    Cr,
    /// Last line of the document.
    None,
}

impl LineTerminator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
            Self::None => "",
        }
    }

    pub fn len(self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(self) -> bool {
        self == Self::None
    }
}
