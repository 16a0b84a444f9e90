//! Smoke tests for the folio CLI
//!
//! These tests verify basic CLI functionality works correctly.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the folio binary
fn folio() -> Command {
    Command::cargo_bin("folio").expect("folio binary should exist")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.1"));
}

#[test]
fn test_help_flag() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("curves"))
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_no_args_fails() {
    folio().assert().failure();
}

// ============================================================================
// Curves and Sample
// ============================================================================

#[test]
fn test_curves_lists_every_family() {
    folio()
        .arg("curves")
        .assert()
        .success()
        .stdout(predicate::str::contains("linear"))
        .stdout(predicate::str::contains("easeInOutCubic"))
        .stdout(predicate::str::contains("easeOutElastic"));
}

#[test]
fn test_sample_json() {
    let output = folio()
        .args(["sample", "linear", "-n", "5", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let keyframes: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let keyframes = keyframes.as_array().unwrap();
    assert_eq!(keyframes.len(), 5);
    assert_eq!(keyframes[4]["value"], 1.0);
}

#[test]
fn test_sample_unknown_easing_fails() {
    folio()
        .args(["sample", "easeOutBounce"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("easeOutBounce"));
}

#[test]
fn test_sample_too_few_points_fails() {
    folio()
        .args(["sample", "linear", "-n", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--samples"));
}

#[test]
fn test_sample_output_verifies() {
    let dir = TempDir::new().unwrap();
    let frames = dir.path().join("frames.json");
    let output = folio()
        .args(["sample", "easeOutQuart", "-n", "9", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    fs::write(&frames, output).unwrap();

    folio()
        .args(["verify", frames.to_str().unwrap(), "-e", "easeOutQuart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max deviation:  0.000000"));

    folio()
        .args(["verify", frames.to_str().unwrap(), "-e", "linear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Easing verification failed"));
}

// ============================================================================
// Simulate
// ============================================================================

#[test]
fn test_simulate_reaches_target() {
    folio()
        .args(["simulate", "--to", "100", "-d", "64", "-e", "linear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("width over 64ms with linear"))
        .stdout(predicate::str::contains("width=100px"));
}

#[test]
fn test_simulate_negative_target() {
    folio()
        .args(["simulate", "-p", "opacity", "--from", "1", "--to", "-1", "-d", "32"])
        .assert()
        .success()
        .stdout(predicate::str::contains("opacity=-1"));
}

#[test]
fn test_simulate_zero_targets_fails() {
    folio()
        .args(["simulate", "--targets", "0"])
        .assert()
        .failure();
}

#[test]
fn test_simulate_frame_budget_overrun_fails() {
    folio()
        .args(["simulate", "-d", "1000", "--max-frames", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-frames"))
        .stderr(predicate::str::contains("Simulation still running after 5 frames"));
}

#[test]
fn test_missing_config_file_fails() {
    folio()
        .args(["--config", "/nonexistent/engine.yaml", "curves"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_simulate_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("engine.yaml");
    fs::write(&config, "default_duration_ms: 48\ndefault_easing: easeInQuad\n").unwrap();

    folio()
        .args(["--config", config.to_str().unwrap(), "simulate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("over 48ms with easeInQuad"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("engine.yaml");
    fs::write(&config, "default_duration_ms: 0\n").unwrap();

    folio()
        .args(["--config", config.to_str().unwrap(), "curves"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_accepts_complete_form() {
    folio()
        .args([
            "validate",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--subject",
            "Hello",
            "--message",
            "Nice site",
        ])
        .assert()
        .success();
}

#[test]
fn test_validate_rejects_bad_email() {
    folio()
        .args([
            "validate",
            "--name",
            "Ada",
            "--email",
            "ada@example",
            "--subject",
            "Hello",
            "--message",
            "Nice site",
            "--format",
            "json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("email"));
}

// ============================================================================
// Theme
// ============================================================================

#[test]
fn test_theme_toggle_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");
    let store = store.to_str().unwrap();

    folio()
        .args(["theme", "--store", store])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));

    folio()
        .args(["-q", "theme", "toggle", "--store", store])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    folio()
        .args(["theme", "show", "--store", store])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));
}
