//! The outward boundary of the parser: build, parse and update documents.

use crate::config::Config;
use crate::line_parser::parse_lines;
use crate::parser::{InternalError, ParseContext, ParseError, Registry};
use crate::syntax::{ContentUpdate, ElementType, ParsedDocument};
use crate::update_parser::parse_update;

/// A configured set of grammars.
///
/// ```
/// use markline::{ContentUpdate, Dialect};
///
/// let dialect = Dialect::default();
/// let mut doc = dialect.parse_complete_text("# Title\n\nSome text").unwrap();
/// let absorbed = dialect
///     .parse_update(&mut doc, &ContentUpdate::insert(13, " more"))
///     .unwrap();
/// assert!(absorbed);
/// assert_eq!(doc.text(), "# Title\n\nSome more text");
/// ```
#[derive(Debug, Default)]
pub struct Dialect {
    registry: Registry,
}

impl Dialect {
    pub fn new(config: Config) -> Self {
        Self {
            registry: Registry::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.registry.config()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn context(&self) -> ParseContext<'_> {
        ParseContext::new(&self.registry)
    }

    /// A document with a root and no lines.
    pub fn create_empty_document(&self) -> ParsedDocument {
        ParsedDocument::new()
    }

    pub fn parse_complete_text(&self, text: &str) -> Result<ParsedDocument, ParseError> {
        #[cfg(debug_assertions)]
        {
            crate::init_logger();
        }

        let cx = self.context();
        let doc = parse_lines(&cx, cx.parser(ElementType::Document), text)?;
        log::debug!(
            "Parsed {} lines into {} elements",
            doc.line_count(),
            doc.descendants(doc.root()).len()
        );
        Ok(doc)
    }

    /// Applies `update` in place when it can be absorbed incrementally.
    ///
    /// Returns `false` when the caller has to reparse the whole text. The
    /// document is left untouched in that case.
    pub fn parse_update(
        &self,
        doc: &mut ParsedDocument,
        update: &ContentUpdate,
    ) -> Result<bool, InternalError> {
        let cx = self.context();
        Ok(parse_update(&cx, doc, update)?.is_some())
    }

    /// Applies `update`, falling back to a full reparse of the edited text.
    ///
    /// The flag tells whether the edit was absorbed incrementally. Keys into
    /// the returned document may differ from those of `doc` either way, as
    /// detached nodes are compacted away once they pile up.
    pub fn update_or_reparse(
        &self,
        mut doc: ParsedDocument,
        update: &ContentUpdate,
    ) -> Result<(ParsedDocument, bool), ParseError> {
        if self.parse_update(&mut doc, update)? {
            doc.compact_if_grown();
            return Ok((doc, true));
        }
        let text = update
            .apply_to(&doc.text())
            .ok_or(ParseError::InvalidUpdate {
                offset: update.range_offset,
                length: update.range_length,
            })?;
        log::debug!("Reparsing {} bytes after a refused edit", text.len());
        Ok((self.parse_complete_text(&text)?, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn empty_document_has_a_root_and_no_lines() {
        let doc = Dialect::default().create_empty_document();
        assert!(doc.is_empty());
        assert_eq!(doc.element(doc.root()).element_type(), ElementType::Document);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn disabled_updates_always_reparse() {
        let dialect = Dialect::new(ConfigBuilder::default().incremental_updates(false).build());
        let mut doc = dialect.parse_complete_text("hello world").unwrap();
        let update = ContentUpdate::insert(3, "x");
        assert!(!dialect.parse_update(&mut doc, &update).unwrap());
        assert_eq!(doc.text(), "hello world");

        let (doc, incremental) = dialect.update_or_reparse(doc, &update).unwrap();
        assert!(!incremental);
        assert_eq!(doc.text(), "helxlo world");
    }

    #[test]
    fn update_outside_text_is_an_error() {
        let dialect = Dialect::default();
        let doc = dialect.parse_complete_text("abc").unwrap();
        let err = dialect
            .update_or_reparse(doc, &ContentUpdate::delete(2, 10))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidUpdate { offset: 2, length: 10 }));
    }
}
