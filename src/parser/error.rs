//! Error types for parsing and incremental updates.
//!
//! A grammar that does not match, or an update that cannot be absorbed, is
//! reported as `Ok(None)`. The types here cover the failures that are not
//! ordinary control flow.

use crate::syntax::ParsedDocument;

/// An implementation bug surfaced at runtime. Never caused by bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// A structural contract between parsers and the tree was broken.
    Invariant(String),
    /// A scanning loop failed to advance its index.
    NoProgress { scanner: &'static str, index: usize },
}

impl InternalError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invariant(msg) => write!(f, "internal invariant violated: {}", msg),
            Self::NoProgress { scanner, index } => {
                write!(f, "{} scanner made no progress at index {}", scanner, index)
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// Failure of a complete-text parse.
#[derive(Debug)]
pub enum ParseError {
    /// No grammar accepted a line. Carries the tree built up to that line.
    UnparsableLine {
        /// 1-based.
        line_number: usize,
        text: String,
        partial: Box<ParsedDocument>,
    },
    /// The edit does not fit the text it was applied to.
    InvalidUpdate { offset: usize, length: usize },
    Internal(InternalError),
}

impl ParseError {
    /// The partially built document, when one exists.
    pub fn partial(&self) -> Option<&ParsedDocument> {
        match self {
            Self::UnparsableLine { partial, .. } => Some(partial),
            Self::InvalidUpdate { .. } | Self::Internal(_) => None,
        }
    }

    pub fn into_partial(self) -> Option<ParsedDocument> {
        match self {
            Self::UnparsableLine { partial, .. } => Some(*partial),
            Self::InvalidUpdate { .. } | Self::Internal(_) => None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnparsableLine {
                line_number, text, ..
            } => write!(f, "no parser accepts line {}: {:?}", line_number, text),
            Self::InvalidUpdate { offset, length } => write!(
                f,
                "edit of {} bytes at offset {} does not fit the document",
                length, offset
            ),
            Self::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            Self::UnparsableLine { .. } | Self::InvalidUpdate { .. } => None,
        }
    }
}

impl From<InternalError> for ParseError {
    fn from(err: InternalError) -> Self {
        Self::Internal(err)
    }
}
