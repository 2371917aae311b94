//! The dual tree produced by the parsers.
//!
//! Every element owns an ordered list of [`ParsedLine`]s, one per physical
//! source line it spans. A line holds literals owned by the element itself and
//! fragments (lines) of child elements, so walking an element's lines
//! reproduces its exact source text while the derived
//! [`content`](ParsedDocument::content) gives the structural children.

mod dump;
mod ids;
mod kind;
mod line_content;
mod tree;
mod update;

pub use ids::IdGenerator;
pub use kind::{CodeFence, ElementKind, ElementType, OptionsBlock};
pub use line_content::{LineContent, LineKey, LineTerminator, ParsedLine, TextRun};
pub use tree::{ChildrenChangedListener, Element, ElementKey, ParsedDocument};
pub use update::ContentUpdate;
