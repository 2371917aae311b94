//! Inline grammars, tried at every offset in this order: code span, link,
//! emphasis, strike-through, text.

mod code_spans;
mod emphasis;
mod links;
mod strikeout;
mod text;

pub use code_spans::CodeSpanParser;
pub use emphasis::EmphasisParser;
pub use links::LinkParser;
pub use strikeout::StrikethroughParser;
pub use text::TextParser;
