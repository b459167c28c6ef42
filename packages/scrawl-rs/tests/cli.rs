//! Integration tests for the CLI commands

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const RESPONSE: &str = r#"{"responses": [{"textAnnotations": [
  {"description": "the", "confidence": 0.9},
  {"description": "the", "confidence": 0.7},
  {"description": "cat"}
]}]}"#;

#[test]
fn test_version_command() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("scrawl "));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("scrawl "));
}

#[test]
fn test_version_short_flag() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("-V");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("scrawl "));
}

#[test]
fn test_clean_argument() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.args(["clean", "the the cat cat cat"]);

    cmd.assert().success().stdout("the cat\n");
}

#[test]
fn test_clean_stdin_with_flatten() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.args(["clean", "--flatten"])
        .write_stdin("Height is 9.8 meters. Next line");

    cmd.assert()
        .success()
        .stdout("Height is 9.8 meters. Next line\n");
}

#[test]
fn test_analyze_exports_results() {
    let dir = tempfile::tempdir().unwrap();
    let response = dir.path().join("page.json");
    std::fs::write(&response, RESPONSE).unwrap();
    let out = dir.path().join("out");

    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("analyze")
        .arg(&response)
        .arg("--output-dir")
        .arg(&out)
        .arg("--quiet");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("the cat"))
        .stdout(predicate::str::contains("Confidence Score: 80.00%"));

    assert_eq!(std::fs::read_to_string(out.join("cleaned_text.txt")).unwrap(), "the cat");
    assert_eq!(
        std::fs::read_to_string(out.join("confidence_score.txt")).unwrap(),
        "Confidence Score: 80.00%"
    );
    assert!(out.join("analysis.json").exists());
}

#[test]
fn test_analyze_reports_blank_response() {
    let dir = tempfile::tempdir().unwrap();
    let response = dir.path().join("blank.json");
    std::fs::write(&response, r#"{"responses": [{}]}"#).unwrap();

    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("analyze")
        .arg(&response)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--quiet");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No text detected"));
}

#[test]
fn test_analyze_fails_on_provider_error() {
    let dir = tempfile::tempdir().unwrap();
    let response = dir.path().join("error.json");
    std::fs::write(
        &response,
        r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("analyze")
        .arg(&response)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--quiet");

    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert_eq!(stderr.matches("Bad image data.").count(), 1, "stderr: {stderr}");
}

#[test]
fn test_analyze_rejects_image_for_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page.json"), RESPONSE).unwrap();

    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.arg("analyze")
        .arg(dir.path())
        .arg("--image")
        .arg(dir.path().join("scan.png"))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--quiet");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("needs a single response file"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_analyze_missing_input() {
    let mut cmd = cargo_bin_cmd!("scrawl");
    cmd.args(["analyze", "/nonexistent/response.json", "--quiet"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Input not found"));
}
