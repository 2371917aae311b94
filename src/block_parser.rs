//! Block-level grammars: document, sections, headings, paragraphs, fenced
//! code blocks, blank lines and options blocks.

mod blank_lines;
mod code_blocks;
mod document;
mod headings;
mod options;
mod paragraphs;
mod sections;
mod utils;

pub use blank_lines::BlankLineParser;
pub use code_blocks::CodeBlockParser;
pub use document::DocumentParser;
pub use headings::HeadingParser;
pub use options::OptionsParser;
pub use paragraphs::ParagraphParser;
pub use sections::SectionParser;
