//! CLI Integration Tests
//!
//! End-to-end tests for CLI commands using assert_cmd.

mod common;

use assert_cmd::Command;
use common::{make_booking, make_driver, wednesday_2pm};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the sentinel binary for testing, run from `dir` so no stray config is picked up
fn sentinel_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sentinel").unwrap();
    cmd.current_dir(dir).env("SENTINEL_LOG_LEVEL", "error");
    cmd
}

fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let booking = make_booking("bk-cli", 10.0, wednesday_2pm());
    let drivers = vec![make_driver("drv-near", 1.0, 4.5), make_driver("drv-far", 12.0, 4.9)];

    let booking_path = dir.join("booking.json");
    let drivers_path = dir.join("drivers.json");
    std::fs::write(&booking_path, serde_json::to_string_pretty(&booking).unwrap()).unwrap();
    std::fs::write(&drivers_path, serde_json::to_string_pretty(&drivers).unwrap()).unwrap();
    (booking_path, drivers_path)
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();
    sentinel_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sentinel"));
}

#[test]
fn test_help_shows_all_commands() {
    let dir = TempDir::new().unwrap();
    sentinel_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quote"))
        .stdout(predicate::str::contains("dispatch"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_quote_table_output() {
    let dir = TempDir::new().unwrap();
    let (booking, _) = write_fixtures(dir.path());

    sentinel_cmd(dir.path())
        .args(["quote", booking.to_str().unwrap(), "--estimate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bk-cli"))
        .stdout(predicate::str::contains("42.00"))
        .stdout(predicate::str::contains("Estimate:"));
}

#[test]
fn test_quote_json_output() {
    let dir = TempDir::new().unwrap();
    let (booking, _) = write_fixtures(dir.path());

    let output = sentinel_cmd(dir.path())
        .args(["quote", booking.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["quotes"][0]["booking_id"], "bk-cli");
    assert_eq!(json["quotes"][0]["pricing"]["surge_window"], "standard");
}

#[test]
fn test_quote_invalid_booking_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    let booking = make_booking("bk-bad", -2.0, wednesday_2pm());
    std::fs::write(&path, serde_json::to_string(&booking).unwrap()).unwrap();

    sentinel_cmd(dir.path())
        .args(["quote", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("bk-bad"));
}

#[test]
fn test_dispatch_outputs_decision() {
    let dir = TempDir::new().unwrap();
    let (booking, drivers) = write_fixtures(dir.path());

    sentinel_cmd(dir.path())
        .args([
            "dispatch",
            booking.to_str().unwrap(),
            "--drivers",
            drivers.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("RECOMMENDED"))
        .stdout(predicate::str::contains("drv-near"));
}

#[test]
fn test_dispatch_batch_json() {
    let dir = TempDir::new().unwrap();
    let (booking, drivers) = write_fixtures(dir.path());

    let output = sentinel_cmd(dir.path())
        .args([
            "dispatch",
            booking.to_str().unwrap(),
            "--drivers",
            drivers.to_str().unwrap(),
            "--batch",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["assignments"][0]["decision"]["driver_id"], "drv-near");
}

#[test]
fn test_health_json() {
    let dir = TempDir::new().unwrap();

    let output = sentinel_cmd(dir.path())
        .args(["health", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["overall"], "healthy");
}

#[test]
fn test_config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("sentinel.toml");

    sentinel_cmd(dir.path())
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[pricing]"));
}

#[test]
fn test_config_init_no_overwrite() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("sentinel.toml");
    std::fs::write(&config_path, "existing content").unwrap();

    sentinel_cmd(dir.path())
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let (booking, _) = write_fixtures(dir.path());
    std::fs::write(
        dir.path().join("sentinel.toml"),
        "[matching.weights]\ndistance = 0.9\n",
    )
    .unwrap();

    sentinel_cmd(dir.path())
        .args(["quote", booking.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matching.weights"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    sentinel_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sentinel"));
}
