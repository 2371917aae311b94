//! Update subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_doc(temp_dir: &TempDir, content: &str) -> String {
    let path = temp_dir.path().join("doc.md");
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_update_incremental() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(&temp_dir, "# the original heading");

    cargo_bin_cmd!("markline")
        .args(["update", &file, "--offset", "6", "--length", "8"])
        .args(["--text", "updated", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("incremental\n"))
        .stdout(predicate::str::contains("\"the updated heading\""))
        .stdout(predicate::str::contains("Matches a full reparse"));
}

#[test]
fn test_update_falls_back_to_full_reparse() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(&temp_dir, "[link](url)");

    cargo_bin_cmd!("markline")
        .args(["update", &file, "--offset", "3", "--text", "!", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("full reparse\n"))
        .stdout(predicate::str::contains("\"li!nk\""));
}

#[test]
fn test_update_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(&temp_dir, "hello world");

    cargo_bin_cmd!("markline")
        .args(["update", &file, "--offset", "5", "--text", ","])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hello, world\""));

    assert_eq!(fs::read_to_string(&file).unwrap(), "hello world");
}

#[test]
fn test_update_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(&temp_dir, "short");

    cargo_bin_cmd!("markline")
        .args(["update", &file, "--offset", "40", "--length", "2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not fit the document"));
}

#[test]
fn test_update_requires_offset() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(&temp_dir, "text");

    cargo_bin_cmd!("markline")
        .args(["update", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--offset"));
}
