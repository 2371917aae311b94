//! Grammar-agnostic drivers: container growth and inline tokenizing.

use super::{InternalError, LineSpan, ParseContext, ParseResult, Watchdog};
use crate::syntax::{ElementKey, ElementType, ParsedDocument};

/// Grows a block container by one line.
///
/// Continuation outranks starting something new: an unfinished last child is
/// offered the line first. Otherwise `ordered` parsers are tried in turn and
/// the first new child is attached, unless `ends_previous` says that child
/// closes the container. Returns the container, or `None` when the line does
/// not belong here.
pub fn parse_block<F, E>(
    cx: &ParseContext<'_>,
    doc: &mut ParsedDocument,
    previous: Option<ElementKey>,
    span: LineSpan<'_>,
    factory: F,
    ordered: &[ElementType],
    ends_previous: E,
) -> ParseResult<Option<ElementKey>>
where
    F: FnOnce(&mut ParsedDocument) -> ElementKey,
    E: Fn(&ParsedDocument, ElementKey, ElementKey) -> bool,
{
    let container = match previous {
        Some(container) => container,
        None => factory(doc),
    };
    doc.add_line(container);

    if let Some(child) = doc.last_child(container)
        && !doc.element(child).is_fully_parsed()
    {
        let parser = cx.parser(doc.element(child).parser());
        match parser.parse_line(cx, doc, Some(child), span)? {
            Some(extended) if extended == child => {
                doc.add_content(container, child)?;
                return Ok(Some(container));
            }
            Some(_) => {
                return Err(InternalError::invariant(format!(
                    "{} {} was continued into a different element",
                    doc.element(child).element_type(),
                    doc.element(child).id()
                )));
            }
            None => {
                log::trace!(
                    "{} {} declined line at {}",
                    doc.element(child).element_type(),
                    doc.element(child).id(),
                    span.start()
                );
                doc.element_mut(child).is_fully_parsed = true;
            }
        }
    }

    for &ty in ordered {
        let Some(child) = cx.parser(ty).parse_line(cx, doc, None, span)? else {
            continue;
        };
        if let Some(previous) = previous
            && ends_previous(doc, previous, child)
        {
            log::trace!("{} closes {}", ty, doc.element(previous).element_type());
            doc.pop_line(container);
            return Ok(None);
        }
        log::trace!("{} starts at {}", ty, span.start());
        doc.add_content(container, child)?;
        return Ok(Some(container));
    }

    doc.pop_line(container);
    Ok(None)
}

/// Fills `owner`'s current line with inline elements covering `span`.
///
/// Greedy and left to right: at every offset the first inline parser in
/// precedence order that matches wins. Returns `false` when nothing matches
/// at some offset.
pub fn parse_inline_content(
    cx: &ParseContext<'_>,
    doc: &mut ParsedDocument,
    owner: ElementKey,
    span: LineSpan<'_>,
) -> ParseResult<bool> {
    let mut watchdog = Watchdog::new("inline content");
    let mut pos = 0;
    'outer: while pos < span.len() {
        watchdog.advance(pos)?;
        let rest = span.tail(pos);
        for &ty in cx.inline_order() {
            let Some(child) = cx.parser(ty).parse_line(cx, doc, None, rest)? else {
                continue;
            };
            let lines = doc.element(child).lines();
            let [line] = lines else {
                return Err(InternalError::invariant(format!(
                    "inline {} produced {} lines",
                    ty,
                    lines.len()
                )));
            };
            let consumed = doc.node_len(*line);
            if consumed == 0 || consumed > rest.len() {
                return Err(InternalError::invariant(format!(
                    "inline {} consumed {} of {} bytes",
                    ty,
                    consumed,
                    rest.len()
                )));
            }
            doc.add_content(owner, child)?;
            pos += consumed;
            continue 'outer;
        }
        log::debug!("No inline parser matches at {}", rest.start());
        return Ok(false);
    }
    Ok(true)
}
