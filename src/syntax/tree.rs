//! Arena-backed dual tree: structural elements plus the line-content tree.
//!
//! Elements and line-content nodes live in two arenas owned by a
//! [`ParsedDocument`] and refer to each other by key. `belongs_to` is a plain
//! key lookup, so the element ↔ line back-references never alias. Arenas are
//! append-only between compactions: nodes detached by an update stay
//! allocated and their keys stay valid until [`ParsedDocument::compact`]
//! drops whatever is no longer reachable from the root.

use std::fmt;
use std::ops::Range;

use id_arena::Arena;

use super::ids::IdGenerator;
use super::kind::{ElementKind, ElementType};
use super::line_content::{LineContent, LineKey, LineTerminator, ParsedLine, TextRun};
use crate::parser::InternalError;

pub type ElementKey = id_arena::Id<Element>;

/// Fired synchronously when an element's structural children change.
/// Treat it as a boolean signal; it says nothing about how many changed.
pub type ChildrenChangedListener = Box<dyn FnMut()>;

/// A structural tree node.
pub struct Element {
    pub(crate) id: String,
    pub(crate) kind: ElementKind,
    pub(crate) lines: Vec<LineKey>,
    pub(crate) parser: ElementType,
    pub(crate) is_fully_parsed: bool,
    pub(crate) on_children_changed: Option<ChildrenChangedListener>,
}

impl Element {
    fn new(id: String, kind: ElementKind) -> Self {
        Self {
            id,
            parser: kind.element_type(),
            kind,
            lines: Vec::new(),
            is_fully_parsed: false,
            on_children_changed: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Key of the parser that produced this element.
    pub fn parser(&self) -> ElementType {
        self.parser
    }

    pub fn lines(&self) -> &[LineKey] {
        &self.lines
    }

    /// Whether the element refuses further continuation lines.
    pub fn is_fully_parsed(&self) -> bool {
        self.is_fully_parsed
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("lines", &self.lines)
            .field("is_fully_parsed", &self.is_fully_parsed)
            .field("has_listener", &self.on_children_changed.is_some())
            .finish()
    }
}

/// A parsed document: both arenas, the root element, the line terminators
/// seen in the source and the document-scoped id generator.
#[derive(Debug)]
pub struct ParsedDocument {
    elements: Arena<Element>,
    contents: Arena<LineContent>,
    root: ElementKey,
    terminators: Vec<LineTerminator>,
    ids: IdGenerator,
    compacted_size: usize,
}

/// Allocations below this never trigger an automatic compaction.
const MIN_COMPACT_SIZE: usize = 256;

impl Default for ParsedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsedDocument {
    /// An empty document: a root element without lines.
    pub fn new() -> Self {
        let mut ids = IdGenerator::new();
        let mut elements = Arena::new();
        let root = elements.alloc(Element::new(ids.element_id(), ElementKind::Document));
        Self {
            elements,
            contents: Arena::new(),
            root,
            terminators: Vec::new(),
            ids,
            compacted_size: 0,
        }
    }

    pub fn root(&self) -> ElementKey {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: ElementKey) {
        self.root = root;
    }

    pub fn element(&self, key: ElementKey) -> &Element {
        &self.elements[key]
    }

    pub(crate) fn element_mut(&mut self, key: ElementKey) -> &mut Element {
        &mut self.elements[key]
    }

    pub fn node(&self, key: LineKey) -> &LineContent {
        &self.contents[key]
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.elements[self.root].lines.is_empty()
    }

    /// Number of physical lines in the document.
    pub fn line_count(&self) -> usize {
        self.elements[self.root].lines.len()
    }

    pub fn terminators(&self) -> &[LineTerminator] {
        &self.terminators
    }

    pub(crate) fn push_terminator(&mut self, terminator: LineTerminator) {
        self.terminators.push(terminator);
    }

    pub(crate) fn create_element(&mut self, kind: ElementKind) -> ElementKey {
        let id = self.ids.element_id();
        log::trace!("Creating {} {}", kind.element_type(), id);
        self.elements.alloc(Element::new(id, kind))
    }

    /// Appends an empty owned line to `element`.
    pub fn add_line(&mut self, element: ElementKey) -> LineKey {
        let id = self.ids.line_id();
        let line = self.contents.alloc(LineContent::Line(ParsedLine {
            id,
            children: Vec::new(),
            belongs_to: element,
        }));
        self.elements[element].lines.push(line);
        line
    }

    pub(crate) fn pop_line(&mut self, element: ElementKey) -> Option<LineKey> {
        self.elements[element].lines.pop()
    }

    fn current_line(&self, element: ElementKey) -> Result<LineKey, InternalError> {
        let el = &self.elements[element];
        el.lines.last().copied().ok_or_else(|| {
            InternalError::invariant(format!(
                "{} {} has no line to add content to",
                el.element_type(),
                el.id
            ))
        })
    }

    fn push_child(&mut self, line: LineKey, child: LineKey) -> Result<(), InternalError> {
        match &mut self.contents[line] {
            LineContent::Line(parsed) => {
                parsed.children.push(child);
                Ok(())
            }
            LineContent::Text(_) => Err(InternalError::invariant(
                "element line is a literal instead of a parsed line",
            )),
        }
    }

    /// Appends a literal owned by `element` to its current line.
    pub fn add_literal(
        &mut self,
        element: ElementKey,
        text: &str,
        start: usize,
    ) -> Result<LineKey, InternalError> {
        let line = self.current_line(element)?;
        let run = self.contents.alloc(LineContent::Text(TextRun {
            text: text.to_string(),
            start,
            belongs_to: element,
        }));
        self.push_child(line, run)?;
        Ok(run)
    }

    /// Copies `child`'s last line fragment into `element`'s current line.
    ///
    /// Fails when either element has no line yet.
    pub fn add_content(
        &mut self,
        element: ElementKey,
        child: ElementKey,
    ) -> Result<(), InternalError> {
        let line = self.current_line(element)?;
        let fragment = self.current_line(child)?;
        let is_new_child = self.last_child(element) != Some(child);
        self.push_child(line, fragment)?;
        if is_new_child && self.elements[child].element_type() != ElementType::Options {
            self.notify_children_changed(element);
        }
        Ok(())
    }

    /// Derived structural children of `element`, recomputed on every call.
    ///
    /// Flattens the element's lines, drops fragments it owns itself and
    /// options metadata, maps the rest to their owners and collapses
    /// consecutive duplicates.
    pub fn content(&self, element: ElementKey) -> Vec<ElementKey> {
        self.collect_children(element, false)
    }

    /// Like [`content`](Self::content) but keeps options blocks.
    pub fn children_with_metadata(&self, element: ElementKey) -> Vec<ElementKey> {
        self.collect_children(element, true)
    }

    fn collect_children(&self, element: ElementKey, include_options: bool) -> Vec<ElementKey> {
        let mut out: Vec<ElementKey> = Vec::new();
        for &line in &self.elements[element].lines {
            for &child in self.contents[line].children() {
                let owner = self.contents[child].belongs_to();
                if owner == element {
                    continue;
                }
                if !include_options && self.elements[owner].element_type() == ElementType::Options
                {
                    continue;
                }
                if out.last() != Some(&owner) {
                    out.push(owner);
                }
            }
        }
        out
    }

    /// The most recently attached child, options included.
    pub fn last_child(&self, element: ElementKey) -> Option<ElementKey> {
        self.elements[element].lines.iter().rev().find_map(|&line| {
            self.contents[line]
                .children()
                .iter()
                .rev()
                .map(|&child| self.contents[child].belongs_to())
                .find(|&owner| owner != element)
        })
    }

    /// The options block attached to `element`, if any.
    pub fn options_of(&self, element: ElementKey) -> Option<ElementKey> {
        self.children_with_metadata(element)
            .into_iter()
            .find(|&child| self.elements[child].element_type() == ElementType::Options)
    }

    /// Pre-order walk over `element` and every element below it.
    pub fn descendants(&self, element: ElementKey) -> Vec<ElementKey> {
        let mut out = Vec::new();
        let mut stack = vec![element];
        while let Some(next) = stack.pop() {
            out.push(next);
            let children = self.children_with_metadata(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    pub fn node_start(&self, key: LineKey) -> Option<usize> {
        match &self.contents[key] {
            LineContent::Text(run) => Some(run.start),
            LineContent::Line(line) => line.children.iter().find_map(|&c| self.node_start(c)),
        }
    }

    pub fn node_end(&self, key: LineKey) -> Option<usize> {
        match &self.contents[key] {
            LineContent::Text(run) => Some(run.start + run.len()),
            LineContent::Line(line) => line.children.iter().rev().find_map(|&c| self.node_end(c)),
        }
    }

    pub fn node_range(&self, key: LineKey) -> Option<Range<usize>> {
        Some(self.node_start(key)?..self.node_end(key)?)
    }

    pub fn node_len(&self, key: LineKey) -> usize {
        self.node_range(key).map_or(0, |r| r.len())
    }

    /// Raw text of a node.
    pub fn as_text(&self, key: LineKey) -> String {
        let mut out = String::new();
        self.write_text(key, &mut out, false);
        out
    }

    /// HTML-escaped text of a node.
    pub fn as_html(&self, key: LineKey) -> String {
        let mut out = String::new();
        self.write_text(key, &mut out, true);
        out
    }

    fn write_text(&self, key: LineKey, out: &mut String, escape: bool) {
        match &self.contents[key] {
            LineContent::Text(run) if escape => out.push_str(&html_escape::encode_text(&run.text)),
            LineContent::Text(run) => out.push_str(&run.text),
            LineContent::Line(line) => {
                for &child in &line.children {
                    self.write_text(child, out, escape);
                }
            }
        }
    }

    /// Source range spanned by `element`, from its first to its last line.
    pub fn element_range(&self, element: ElementKey) -> Option<Range<usize>> {
        let lines = &self.elements[element].lines;
        let start = lines.iter().find_map(|&l| self.node_start(l))?;
        let end = lines.iter().rev().find_map(|&l| self.node_end(l))?;
        Some(start..end)
    }

    /// The element's lines joined by the source line terminators.
    pub fn element_text(&self, element: ElementKey) -> String {
        let lines = &self.elements[element].lines;
        let mut out = String::new();
        for (i, &line) in lines.iter().enumerate() {
            self.write_text(line, &mut out, false);
            if i + 1 < lines.len()
                && let Some(end) = self.node_end(line)
                && let Some(physical) = self.physical_line_at(end)
            {
                out.push_str(self.terminators[physical].as_str());
            }
        }
        out
    }

    /// Reproduces the complete document text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, &line) in self.elements[self.root].lines.iter().enumerate() {
            self.write_text(line, &mut out, false);
            if let Some(terminator) = self.terminators.get(i) {
                out.push_str(terminator.as_str());
            }
        }
        out
    }

    /// Index of the physical line containing `offset`.
    pub fn physical_line_at(&self, offset: usize) -> Option<usize> {
        let lines = &self.elements[self.root].lines;
        let index =
            lines.partition_point(|&line| self.node_start(line).is_some_and(|s| s <= offset));
        index.checked_sub(1)
    }

    pub(crate) fn contains_line(&self, element: ElementKey, line: LineKey) -> bool {
        self.elements[element].lines.contains(&line)
    }

    pub(crate) fn set_child(
        &mut self,
        composite: LineKey,
        index: usize,
        child: LineKey,
    ) -> Result<(), InternalError> {
        match &mut self.contents[composite] {
            LineContent::Line(line) if index < line.children.len() => {
                line.children[index] = child;
                Ok(())
            }
            _ => Err(InternalError::invariant(format!(
                "cannot splice child {} into line content",
                index
            ))),
        }
    }

    /// Replaces `old` in `element`'s lines with `new`, returning its index.
    pub(crate) fn replace_line(
        &mut self,
        element: ElementKey,
        old: LineKey,
        new: LineKey,
    ) -> Result<usize, InternalError> {
        let el = &mut self.elements[element];
        let index = el.lines.iter().position(|&l| l == old).ok_or_else(|| {
            InternalError::invariant(format!(
                "lost track of a line of {} {}",
                el.kind.element_type(),
                el.id
            ))
        })?;
        el.lines[index] = new;
        Ok(index)
    }

    /// Moves every literal below `key` by `delta` bytes.
    pub(crate) fn shift(&mut self, key: LineKey, delta: isize) -> Result<(), InternalError> {
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            match &mut self.contents[next] {
                LineContent::Text(run) => {
                    run.start = run.start.checked_add_signed(delta).ok_or_else(|| {
                        InternalError::invariant("shifted a literal before the document start")
                    })?;
                }
                LineContent::Line(line) => stack.extend(line.children.iter().copied()),
            }
        }
        Ok(())
    }

    /// Re-homes the nodes of `line` owned by `from` onto `into`.
    pub(crate) fn adopt_line(&mut self, line: LineKey, from: ElementKey, into: ElementKey) {
        let mut stack = vec![line];
        while let Some(next) = stack.pop() {
            match &mut self.contents[next] {
                LineContent::Text(run) => {
                    if run.belongs_to == from {
                        run.belongs_to = into;
                    }
                }
                LineContent::Line(parsed) => {
                    if parsed.belongs_to == from {
                        parsed.belongs_to = into;
                    }
                    stack.extend(parsed.children.iter().copied());
                }
            }
        }
    }

    /// Number of allocated elements and line-content nodes, reachable or not.
    pub fn allocated(&self) -> usize {
        self.elements.len() + self.contents.len()
    }

    /// Drops every element and line-content node no longer reachable from
    /// the root.
    ///
    /// Keys obtained before the call are invalidated. Element and line ids,
    /// listeners and the id generator are carried over unchanged.
    pub fn compact(&mut self) {
        let (live_elements, live_contents) = self.mark_reachable();
        let elements = std::mem::replace(&mut self.elements, Arena::new());
        let contents = std::mem::replace(&mut self.contents, Arena::new());

        let mut element_keys = vec![None; live_elements.len()];
        for (key, element) in elements {
            if live_elements[key.index()] {
                element_keys[key.index()] = Some(self.elements.alloc(element));
            }
        }
        let mut content_keys = vec![None; live_contents.len()];
        for (key, content) in contents {
            if live_contents[key.index()] {
                content_keys[key.index()] = Some(self.contents.alloc(content));
            }
        }

        let remap_lines = |lines: &mut Vec<LineKey>| {
            *lines = lines.iter().filter_map(|l| content_keys[l.index()]).collect();
        };
        for (_, element) in self.elements.iter_mut() {
            remap_lines(&mut element.lines);
        }
        for (_, content) in self.contents.iter_mut() {
            let belongs_to = match content {
                LineContent::Text(run) => &mut run.belongs_to,
                LineContent::Line(line) => {
                    remap_lines(&mut line.children);
                    &mut line.belongs_to
                }
            };
            if let Some(owner) = element_keys[belongs_to.index()] {
                *belongs_to = owner;
            }
        }
        if let Some(root) = element_keys[self.root.index()] {
            self.root = root;
        }

        log::debug!(
            "Compacted arenas from {} to {} nodes",
            live_elements.len() + live_contents.len(),
            self.allocated()
        );
        self.compacted_size = self.allocated();
    }

    /// Compacts once allocations have doubled since the last compaction.
    pub(crate) fn compact_if_grown(&mut self) -> bool {
        if self.allocated() <= (2 * self.compacted_size).max(MIN_COMPACT_SIZE) {
            return false;
        }
        self.compact();
        true
    }

    /// Liveness by arena index. Owners of reachable line content are live
    /// even when no element line leads to them.
    fn mark_reachable(&self) -> (Vec<bool>, Vec<bool>) {
        let mut elements = vec![false; self.elements.len()];
        let mut contents = vec![false; self.contents.len()];
        elements[self.root.index()] = true;
        let mut pending = vec![self.root];
        while let Some(element) = pending.pop() {
            let mut stack = self.elements[element].lines.clone();
            while let Some(key) = stack.pop() {
                if std::mem::replace(&mut contents[key.index()], true) {
                    continue;
                }
                let node = &self.contents[key];
                let owner = node.belongs_to();
                if !std::mem::replace(&mut elements[owner.index()], true) {
                    pending.push(owner);
                }
                stack.extend_from_slice(node.children());
            }
        }
        (elements, contents)
    }

    pub(crate) fn regenerate_id(&mut self, element: ElementKey) {
        let id = self.ids.element_id();
        log::debug!("Element {} is now {}", self.elements[element].id, id);
        self.elements[element].id = id;
    }

    pub fn set_children_changed_listener(
        &mut self,
        element: ElementKey,
        listener: impl FnMut() + 'static,
    ) {
        self.elements[element].on_children_changed = Some(Box::new(listener));
    }

    pub fn clear_children_changed_listener(&mut self, element: ElementKey) {
        self.elements[element].on_children_changed = None;
    }

    pub(crate) fn notify_children_changed(&mut self, element: ElementKey) {
        if let Some(mut listener) = self.elements[element].on_children_changed.take() {
            listener();
            self.elements[element].on_children_changed = Some(listener);
        }
    }
}
