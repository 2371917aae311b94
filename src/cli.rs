use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "markline")]
#[command(author, version)]
#[command(about = "Incremental, line-anchored Markdown parser")]
#[command(
    long_about = "Markline parses Markdown into a tree anchored to physical source lines, so \
    that single-line edits can be absorbed by reparsing only the affected line. The CLI prints \
    the parsed structure and replays edits for inspection."
)]
#[command(after_help = "\
EXAMPLES:

    # Show the structure of a file
    markline parse document.md

    # Parse from stdin
    cat document.md | markline parse

    # Apply an edit and compare with a full reparse
    markline update document.md --offset 10 --length 0 --text 'new ' --check

CONFIGURATION:

Markline looks for configuration files in this order:
  1. Explicit --config path
  2. markline.toml or .markline.toml in current/parent directories
  3. ~/.config/markline/config.toml (XDG)
  4. Built-in defaults

Example .markline.toml:

    flavor = \"markline\"
    incremental_updates = true

    [extensions]
    sections = true
    strikeout = false")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, markline will \
        search for .markline.toml or markline.toml in the current directory and its parents, \
        then fall back to ~/.config/markline/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a document and print its structure
    #[command(
        long_about = "Parse a document and print one line per element: its type, attributes, \
        byte range and, for leaves, the quoted source text. Exits with code 1 if a line \
        cannot be parsed."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Parse a file
    markline parse document.md

    # Parse from stdin
    echo '# Heading' | markline parse")]
    Parse {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,
    },
    /// Apply one edit to a parsed document
    #[command(
        long_about = "Parse FILE, apply a single edit given as a byte offset, a length and \
        replacement text, and print the resulting structure. Reports whether the edit was \
        absorbed incrementally or needed a full reparse."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Insert text at byte 12
    markline update notes.md --offset 12 --text 'more '

    # Replace three bytes and verify against a full reparse
    markline update notes.md --offset 4 --length 3 --text abc --check")]
    Update {
        /// Input file
        #[arg(help = "Input file path")]
        file: PathBuf,

        /// Byte offset of the edit
        #[arg(long)]
        offset: usize,

        /// Number of bytes replaced
        #[arg(long, default_value_t = 0)]
        length: usize,

        /// Replacement text
        #[arg(long, default_value = "")]
        text: String,

        /// Compare the result with a full reparse
        #[arg(long)]
        #[arg(help = "Compare with a full reparse (exit code 1 on mismatch)")]
        #[arg(
            long_help = "Parse the edited text from scratch and compare both structures. \
            On mismatch prints a diff and exits with code 1."
        )]
        check: bool,
    },
}
