//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("markline")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Markline parses Markdown"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("markline")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("markline")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("markline")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_parse_help() {
    cargo_bin_cmd!("markline")
        .args(["parse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parse a document"));
}

#[test]
fn test_update_help() {
    cargo_bin_cmd!("markline")
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--offset"));
}
