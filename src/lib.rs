pub mod block_parser;
pub mod config;
pub mod dialect;
pub mod inline_parser;
pub mod line_parser;
pub mod parser;
pub mod syntax;
pub mod update_parser;

pub use config::Config;
pub use config::ConfigBuilder;
pub use dialect::Dialect;
pub use parser::{InternalError, ParseError};
pub use syntax::{ContentUpdate, ElementKey, ElementKind, ElementType, LineKey, ParsedDocument};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses a document with the given configuration.
///
/// # Examples
///
/// ```rust
/// use markline::parse;
///
/// let doc = parse("# Heading\n\nParagraph text.", None).unwrap();
/// println!("{}", doc.dump());
/// ```
///
/// # Arguments
///
/// * `input` - The document text, with any mix of line terminators
/// * `config` - Optional configuration (defaults to default config)
pub fn parse(input: &str, config: Option<Config>) -> Result<ParsedDocument, ParseError> {
    Dialect::new(config.unwrap_or_default()).parse_complete_text(input)
}

/// Parses a document with the default configuration.
pub fn parse_with_defaults(input: &str) -> Result<ParsedDocument, ParseError> {
    parse(input, None)
}
