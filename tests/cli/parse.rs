//! Parse subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_stdin() {
    cargo_bin_cmd!("markline")
        .arg("parse")
        .write_stdin("# Heading\n\nParagraph.")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOCUMENT"))
        .stdout(predicate::str::contains("SECTION@0..21 level=1"))
        .stdout(predicate::str::contains("HEADING@0..9 level=1"));
}

#[test]
fn test_parse_simple_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "# Heading\n\nParagraph with *emphasis*.").unwrap();

    cargo_bin_cmd!("markline")
        .args(["parse", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEADING"))
        .stdout(predicate::str::contains("PARAGRAPH"))
        .stdout(predicate::str::contains("EMPHASIS"));
}

#[test]
fn test_parse_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    let config_file = temp_dir.path().join("custom.toml");

    fs::write(&test_file, "# Heading\n\n~~gone~~").unwrap();
    fs::write(&config_file, "flavor = \"commonmark\"\n").unwrap();

    cargo_bin_cmd!("markline")
        .args([
            "parse",
            "--config",
            config_file.to_str().unwrap(),
            test_file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEADING"))
        .stdout(predicate::str::contains("SECTION").not())
        .stdout(predicate::str::contains("STRIKETHROUGH").not());
}

#[test]
fn test_parse_discovers_config_next_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "{a=1} text").unwrap();
    fs::write(
        temp_dir.path().join(".markline.toml"),
        "[extensions]\noptions_blocks = false\n",
    )
    .unwrap();

    cargo_bin_cmd!("markline")
        .args(["parse", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OPTIONS").not());
}

#[test]
fn test_parse_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    fs::write(&config_file, "flavor = 42").unwrap();

    cargo_bin_cmd!("markline")
        .args(["parse", "--config", config_file.to_str().unwrap()])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn test_parse_nonexistent_file() {
    cargo_bin_cmd!("markline")
        .args(["parse", "/nonexistent/file.md"])
        .assert()
        .failure();
}

#[test]
fn test_parse_empty_input() {
    cargo_bin_cmd!("markline")
        .arg("parse")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOCUMENT"));
}
