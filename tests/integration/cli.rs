//! Tests for command-line parsing and the config commands

use super::common::{isolated_command, repo_sync_command};
use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    AssertCommand::cargo_bin("repo-sync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_push_requires_repo_flag() {
    let temp = TempDir::new().unwrap();
    let output = repo_sync_command()
        .arg("push")
        .arg(temp.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--repo"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path(), "http://127.0.0.1:9")
        .args(["config", "path"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("repo-sync"));
    assert!(stdout.trim_end().ends_with("config.yaml"));
}

#[test]
fn test_config_show_includes_env_overrides() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path(), "http://127.0.0.1:9")
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("http://127.0.0.1:9"));
    assert!(stdout.contains("app_id: 4242"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path(), "http://127.0.0.1:9")
        .args(["serve", "--bind", "not-an-address"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}
