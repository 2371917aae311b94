//! Incremental reparse after a single-line edit.
//!
//! The engine walks down the line-content tree to the smallest node that
//! contains the edit and asks that node's owner to reparse its line. When the
//! owner declines, the parent gets a go, and so on up to the root line. An
//! absent result means the edit could not be absorbed and the caller has to
//! reparse the whole document.

use crate::parser::{LineSpan, ParseContext, ParseResult};
use crate::syntax::{ContentUpdate, ElementKey, LineKey, ParsedDocument};

/// Per-update state: the edit and the new text of the physical line it hits.
struct UpdateParser<'a, 'r> {
    cx: &'a ParseContext<'r>,
    update: &'a ContentUpdate,
    replaced: &'a str,
    line_text: &'a str,
    line_start: usize,
}

impl UpdateParser<'_, '_> {
    fn contains(&self, doc: &ParsedDocument, key: LineKey) -> bool {
        doc.node_range(key).is_some_and(|range| {
            range.start <= self.update.change_start() && self.update.change_end() <= range.end
        })
    }

    /// Returns the node that now stands where `key` stood.
    fn update_node(&self, doc: &mut ParsedDocument, key: LineKey) -> ParseResult<Option<LineKey>> {
        if !self.contains(doc, key) {
            return Ok(None);
        }

        let children = doc.node(key).children().to_vec();
        for (index, &child) in children.iter().enumerate() {
            let Some(replacement) = self.update_node(doc, child)? else {
                continue;
            };
            if replacement != child {
                doc.set_child(key, index, replacement)?;
            }
            let delta = self.update.length_delta();
            for &later in &children[index + 1..] {
                doc.shift(later, delta)?;
            }
            return Ok(Some(key));
        }

        self.reparse_line(doc, key)
    }

    /// Asks the owner of `key` to reparse it, when `key` is one of its lines.
    fn reparse_line(&self, doc: &mut ParsedDocument, key: LineKey) -> ParseResult<Option<LineKey>> {
        let owner: ElementKey = doc.node(key).belongs_to();
        if !doc.contains_line(owner, key) {
            return Ok(None);
        }
        let Some(range) = doc.node_range(key) else {
            return Ok(None);
        };

        let element = doc.element(owner);
        let parser = self.cx.parser(element.parser());
        if !parser.can_update(self.cx, doc, owner, self.update, self.replaced) {
            log::trace!("{} {} refuses the edit", element.element_type(), element.id());
            return Ok(None);
        }

        let from = range.start - self.line_start;
        let Some(to) = (range.end - self.line_start).checked_add_signed(self.update.length_delta())
        else {
            return Ok(None);
        };
        let span = LineSpan::new(self.line_text, self.line_start).sub(from, to);
        let Some(replacement) = parser.parse_line_update(self.cx, doc, owner, key, span)? else {
            log::trace!(
                "{} {} could not reparse its line",
                doc.element(owner).element_type(),
                doc.element(owner).id()
            );
            return Ok(None);
        };
        if doc.node_range(replacement) != Some(span.start()..span.end()) {
            log::debug!("Replacement line does not cover the edited span");
            return Ok(None);
        }

        let before = doc.content(owner);
        doc.replace_line(owner, key, replacement)?;
        doc.regenerate_id(owner);
        if doc.content(owner) != before {
            doc.notify_children_changed(owner);
        }
        log::debug!(
            "Reparsed a line of {} {}",
            doc.element(owner).element_type(),
            doc.element(owner).id()
        );
        Ok(Some(replacement))
    }
}

/// Applies `update` to `doc` in place.
///
/// Returns the (unchanged) root key when the edit was absorbed, or `None`
/// when the document must be reparsed from scratch. Multi-line edits,
/// ranges outside the text and ranges splitting a character are always
/// refused.
pub fn parse_update(
    cx: &ParseContext<'_>,
    doc: &mut ParsedDocument,
    update: &ContentUpdate,
) -> ParseResult<Option<ElementKey>> {
    if !cx.config().incremental_updates {
        return Ok(None);
    }
    if update.is_multiline() {
        log::debug!("Multi-line edit needs a full reparse");
        return Ok(None);
    }

    let root = doc.root();
    let root_lines = doc.element(root).lines().to_vec();
    for (index, &line) in root_lines.iter().enumerate() {
        let Some(range) = doc.node_range(line) else {
            continue;
        };
        if update.change_start() < range.start || update.change_end() > range.end {
            continue;
        }
        let old_text = doc.as_text(line);
        let local = update.change_start() - range.start..update.change_end() - range.start;
        let Some(replaced) = old_text.get(local) else {
            log::debug!("Edit splits a character, needs a full reparse");
            return Ok(None);
        };
        let Some(new_text) = update.apply_at(&old_text, range.start) else {
            return Ok(None);
        };

        let engine = UpdateParser {
            cx,
            update,
            replaced,
            line_text: &new_text,
            line_start: range.start,
        };
        if engine.update_node(doc, line)?.is_some() {
            let delta = update.length_delta();
            for &later in &root_lines[index + 1..] {
                doc.shift(later, delta)?;
            }
            return Ok(Some(root));
        }
    }

    log::debug!("No line absorbs the edit, needs a full reparse");
    Ok(None)
}
