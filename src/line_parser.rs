//! Line-by-line initial parse.

use crate::parser::{LineSpan, ParseContext, ParseError, ParseResult, Parser, Watchdog};
use crate::syntax::{LineTerminator, ParsedDocument};

/// One physical line: its text range and the terminator that ended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine {
    pub start: usize,
    pub end: usize,
    pub terminator: LineTerminator,
}

/// Splits on `\n`, `\r\n` and `\r` without normalizing.
///
/// Offsets index `text` directly and terminators are never part of a line.
/// Text ending in a terminator has a final empty line. Empty text has none.
pub fn split_lines(text: &str) -> ParseResult<Vec<PhysicalLine>> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return Ok(lines);
    }
    let bytes = text.as_bytes();
    let mut watchdog = Watchdog::new("line split");
    let mut start = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        watchdog.advance(pos)?;
        let terminator = match bytes[pos] {
            b'\n' => LineTerminator::Lf,
            b'\r' if bytes.get(pos + 1) == Some(&b'\n') => LineTerminator::CrLf,
            b'\r' => LineTerminator::Cr,
            _ => {
                pos += 1;
                continue;
            }
        };
        lines.push(PhysicalLine {
            start,
            end: pos,
            terminator,
        });
        pos += terminator.len();
        start = pos;
    }
    lines.push(PhysicalLine {
        start,
        end: text.len(),
        terminator: LineTerminator::None,
    });
    Ok(lines)
}

/// Builds a document by feeding every line to `root_parser`.
///
/// Empty text yields an empty document. A line nobody accepts stops the
/// parse with the tree built so far.
pub fn parse_lines(
    cx: &ParseContext<'_>,
    root_parser: &dyn Parser,
    text: &str,
) -> Result<ParsedDocument, ParseError> {
    let mut doc = ParsedDocument::new();
    let mut root = None;

    for (index, line) in split_lines(text)?.into_iter().enumerate() {
        let span = LineSpan::new(&text[line.start..line.end], line.start);
        log::trace!("Parsing line {}: {:?}", index + 1, span.as_str());
        match root_parser.parse_line(cx, &mut doc, root, span)? {
            Some(next) => {
                root = Some(next);
                doc.push_terminator(line.terminator);
            }
            None => {
                log::debug!("No parser accepts line {}", index + 1);
                if let Some(root) = root {
                    doc.set_root(root);
                }
                return Err(ParseError::UnparsableLine {
                    line_number: index + 1,
                    text: span.as_str().to_string(),
                    partial: Box::new(doc),
                });
            }
        }
    }

    if let Some(root) = root {
        doc.set_root(root);
    }
    Ok(doc)
}
