//! CLI integration tests for markline.
//!
//! These tests execute the compiled binary and verify:
//! - Subcommand behavior (parse, update)
//! - Stdin and file input
//! - Exit codes and error reporting

mod common;
mod parse;
mod update;
