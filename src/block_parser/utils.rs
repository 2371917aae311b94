//! Shared utilities for block parsing.

use crate::parser::{LineSpan, ParseContext, ParseResult};

/// Strip up to 3 leading spaces from a line.
pub(crate) fn strip_leading_spaces(line: &str) -> &str {
    line.strip_prefix("   ")
        .or_else(|| line.strip_prefix("  "))
        .or_else(|| line.strip_prefix(" "))
        .unwrap_or(line)
}

/// Length of the leading run of `fence_char`, if there is one.
pub(crate) fn get_fence_count(line: &str, fence_char: char) -> Option<usize> {
    let count = line.chars().take_while(|&c| c == fence_char).count();
    (count > 0).then_some(count)
}

/// Exactly two trailing spaces.
pub(crate) fn ends_with_hard_break(line: &str) -> bool {
    line.ends_with("  ") && !line.ends_with("   ")
}

/// Whether a higher-precedence block grammar claims `span`.
pub(crate) fn is_interrupted(cx: &ParseContext<'_>, span: LineSpan<'_>) -> ParseResult<bool> {
    for &ty in cx.registry().interrupters() {
        if cx.parser(ty).should_interrupt(cx, None, span)? {
            log::trace!("{} interrupts at {}", ty, span.start());
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_most_three_spaces() {
        assert_eq!(strip_leading_spaces("   ```"), "```");
        assert_eq!(strip_leading_spaces("    ```"), " ```");
        assert_eq!(strip_leading_spaces("```"), "```");
    }

    #[test]
    fn fence_count() {
        assert_eq!(get_fence_count("````rust", '`'), Some(4));
        assert_eq!(get_fence_count("~~~", '`'), None);
    }

    #[test]
    fn hard_break_needs_exactly_two_spaces() {
        assert!(ends_with_hard_break("foo  "));
        assert!(!ends_with_hard_break("foo "));
        assert!(!ends_with_hard_break("foo   "));
        assert!(!ends_with_hard_break("foo"));
    }
}
