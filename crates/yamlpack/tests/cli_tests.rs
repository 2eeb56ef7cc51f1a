//! CLI tests for the yamlpack binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("yamlpack").unwrap()
}

/// Write a small trajectory document and return its path.
fn write_sample(dir: &TempDir, states: usize) -> PathBuf {
    let path = dir.path().join("sample.yaml");
    let mut text = String::from("meta:\n  name: sample\nresult:\n  - states:\n");
    for i in 0..states {
        text.push_str(&format!("      - {:.1}\n", i as f64 * 0.1));
    }
    std::fs::write(&path, text).unwrap();
    path
}

fn compress_sample(input: &Path, output: &Path) {
    cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
}

// ============================================================
// Help and version
// ============================================================

#[test]
fn test_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Selective binary packing"))
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("decompress"));
}

#[test]
fn test_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("yamlpack"));
}

#[test]
fn test_compress_help_lists_options() {
    cmd()
        .args(["compress", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--dtype"));
}

#[test]
fn test_no_args_shows_usage() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ============================================================
// Compress
// ============================================================

#[test]
fn test_compress_writes_output_and_reports() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let output = dir.path().join("sample.packed.yaml");

    cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Compression Results:"))
        .stderr(predicate::str::contains("Ratio:"));

    assert!(output.exists());
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("!packed/v1"), "got: {}", text);
}

#[test]
fn test_compress_verbose_prints_configuration() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 20);
    let output = dir.path().join("out.yaml");

    cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--dtype",
            "f16",
            "--verbose",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration:"))
        .stderr(predicate::str::contains("float16"));
}

#[test]
fn test_compress_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let output = dir.path().join("out.yaml");

    let assert = cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["operation"], "compress");
    assert_eq!(parsed["arrays"], 1);
    assert_eq!(parsed["values"], 50);
    assert!(parsed["ratio"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_compress_threshold_zero_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 20);
    let output = dir.path().join("out.yaml");

    cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--threshold",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));

    assert!(!output.exists(), "nothing may be written for a bad config");
}

#[test]
fn test_compress_unknown_dtype_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 20);

    cmd()
        .args([
            "compress",
            input.to_str().unwrap(),
            "-o",
            dir.path().join("out.yaml").to_str().unwrap(),
            "--dtype",
            "f8",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_compress_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args([
            "compress",
            "/nonexistent/input.yaml",
            "-o",
            dir.path().join("out.yaml").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("I/O error"));
}

// ============================================================
// Decompress
// ============================================================

#[test]
fn test_roundtrip_through_binary() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let packed = dir.path().join("sample.packed.yaml");
    let restored = dir.path().join("sample.restored.yaml");

    compress_sample(&input, &packed);

    cmd()
        .args([
            "decompress",
            packed.to_str().unwrap(),
            "-o",
            restored.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Decompression Results:"));

    // float32 narrows 0.1-step values, so compare structure via the library
    let original = yamlpack::load_document(&input).unwrap();
    let roundtripped = yamlpack::load_document(&restored).unwrap();
    let (yamlpack::Node::Mapping(a), yamlpack::Node::Mapping(b)) = (&original, &roundtripped)
    else {
        panic!("both documents must be mappings");
    };
    assert_eq!(a[0], b[0], "meta block must be untouched");
    assert_eq!(a.len(), b.len());
}

#[test]
fn test_decompress_corrupt_document_fails() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.yaml");
    std::fs::write(
        &bad,
        "states: !packed/v1\n  kind: float\n  width: 32\n  len: 4\n  data: AAAA\n",
    )
    .unwrap();

    cmd()
        .args([
            "decompress",
            bad.to_str().unwrap(),
            "-o",
            dir.path().join("out.yaml").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

// ============================================================
// Info
// ============================================================

#[test]
fn test_info_reports_packed_arrays() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let packed = dir.path().join("sample.packed.yaml");
    compress_sample(&input, &packed);

    cmd()
        .args(["info", packed.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed arrays: 1"))
        .stdout(predicate::str::contains("Packed values: 50"));
}

#[test]
fn test_info_detailed_lists_paths() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let packed = dir.path().join("sample.packed.yaml");
    compress_sample(&input, &packed);

    cmd()
        .args(["info", packed.to_str().unwrap(), "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("result[0].states"))
        .stdout(predicate::str::contains("float32"));
}

#[test]
fn test_info_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir, 50);
    let packed = dir.path().join("sample.packed.yaml");
    compress_sample(&input, &packed);

    let assert = cmd()
        .args(["info", packed.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["arrays"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["arrays"][0]["dtype"], "float32");
    assert_eq!(parsed["arrays"][0]["len"], 50);
    assert_eq!(parsed["values_packed"], 50);
}

#[test]
fn test_info_plain_document() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("plain.yaml");
    std::fs::write(&plain, "a: 1\nb: hello\n").unwrap();

    cmd()
        .args(["info", plain.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed arrays: 0"));
}

// ============================================================
// Completions
// ============================================================

#[test]
fn test_completions_bash() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yamlpack"));
}
