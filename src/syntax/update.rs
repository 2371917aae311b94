//! Text edits applied to a parsed document.

use serde::{Deserialize, Serialize};

/// Replace `range_length` bytes at `range_offset` with `text`.
///
/// Offsets are UTF-8 byte offsets into the current document text, matching
/// the positions stored on literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub range_offset: usize,
    pub range_length: usize,
    pub text: String,
}

impl ContentUpdate {
    pub fn new(range_offset: usize, range_length: usize, text: impl Into<String>) -> Self {
        Self {
            range_offset,
            range_length,
            text: text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, "")
    }

    pub fn change_start(&self) -> usize {
        self.range_offset
    }

    pub fn change_end(&self) -> usize {
        self.range_offset + self.range_length
    }

    /// Whether the inserted text spans a line break.
    pub fn is_multiline(&self) -> bool {
        self.text.contains(['\n', '\r'])
    }

    /// Change in document length caused by the edit.
    pub fn length_delta(&self) -> isize {
        self.text.len() as isize - self.range_length as isize
    }

    /// Whether the edited range is inside `text` and on char boundaries.
    pub fn fits(&self, text: &str) -> bool {
        self.change_end() <= text.len()
            && text.is_char_boundary(self.change_start())
            && text.is_char_boundary(self.change_end())
    }

    /// The text the edit removes from `text`.
    pub fn replaced<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.fits(text) {
            return None;
        }
        Some(&text[self.change_start()..self.change_end()])
    }

    /// `text` with the edit applied, shifted so that `text` starts at `base`.
    pub fn apply_at(&self, text: &str, base: usize) -> Option<String> {
        let start = self.change_start().checked_sub(base)?;
        let end = self.change_end().checked_sub(base)?;
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return None;
        }
        let mut out = String::with_capacity(text.len() + self.text.len());
        out.push_str(&text[..start]);
        out.push_str(&self.text);
        out.push_str(&text[end..]);
        Some(out)
    }

    pub fn apply_to(&self, text: &str) -> Option<String> {
        self.apply_at(text, 0)
    }
}
