//! CLI Integration Tests for true-north
//!
//! These tests execute the binary and verify correct behavior for:
//! - Prompt rendering
//! - Simulated sweeps and stdin input
//! - Offline and fallback readings
//! - Error handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Binary isolated from any config or API key on the host
fn isolated() -> (Command, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("true-north").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("TRUE_NORTH_LOG");
    (cmd, temp_dir)
}

#[test]
fn test_prompt_renders_whole_degrees() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--prompt", "134.6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compass direction: 135 degrees."))
        .stdout(predicate::str::contains("Northeast: Represents spiritual growth and knowledge."));
}

#[test]
fn test_prompt_wraps_negative_heading() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--prompt", "-90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("270 degrees"));
}

#[test]
fn test_offline_sweep_json_frames() {
    let (mut cmd, _dir) = isolated();
    let output = cmd
        .args([
            "--simulate", "0:20:10",
            "--interval-ms", "10",
            "--debounce-ms", "50",
            "--offline",
            "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let last = frames.last().unwrap();
    assert_eq!(last["insight"]["status"], "ready");
    assert_eq!(last["bearing"], "20°");
    assert!(last["insight"]["text"].as_str().unwrap().contains("North"));

    // one loading frame: the sweep settles once
    let loading = frames
        .iter()
        .filter(|f| f["insight"]["status"] == "loading")
        .count();
    assert_eq!(loading, 1);
}

#[test]
fn test_offline_stdin_text_output() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--offline", "--debounce-ms", "20"])
        .write_stdin("{\"alpha\": 270}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 90° E"))
        .stdout(predicate::str::contains("social connections and overall well-being"));
}

#[test]
fn test_stdin_permission_denied() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--offline"])
        .write_stdin("{\"permission\": \"denied\"}\n{\"alpha\": 10}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Permission denied"))
        .stdout(predicate::str::contains("Facing").not());
}

#[test]
fn test_bad_stdin_lines_are_skipped() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--offline", "--debounce-ms", "20", "-v"])
        .write_stdin("garbage\n{\"webkitCompassHeading\": 180}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("180° S"))
        .stderr(predicate::str::contains("skipping line 1"));
}

#[test]
fn test_invalid_sweep_fails() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--simulate", "0:90", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --simulate"));
}

#[test]
fn test_missing_api_key_fails() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--simulate", "0:10:10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--offline"))
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_unreachable_endpoint_shows_fallback() {
    let (mut cmd, dir) = isolated();
    let config_path = dir.path().join("compass.json");
    fs::write(
        &config_path,
        r#"{
            "debounce_ms": 20,
            "fallback_message": "The stars are clouded.",
            "llm": {"base_url": "http://127.0.0.1:9", "timeout_secs": 5}
        }"#,
    )
    .unwrap();

    cmd.env("GEMINI_API_KEY", "test-key")
        .args(["--config", config_path.to_str().unwrap()])
        .write_stdin("{\"webkitCompassHeading\": 45}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The stars are clouded."));
}

#[test]
fn test_config_in_working_directory_is_used() {
    let (mut cmd, dir) = isolated();
    fs::write(dir.path().join(".true_north_config.json"), r#"{"debounce_ms": 0}"#).unwrap();

    cmd.args(["--offline"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("debounce_ms must be positive"));
}

#[test]
fn test_oversized_sweep_is_rejected() {
    let (mut cmd, _dir) = isolated();
    cmd.args(["--simulate", "0:360:1e-300", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --simulate"));
}
