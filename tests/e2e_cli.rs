//! CLI end-to-end tests
//!
//! Tests for the actionforge command-line interface. Every test points the
//! binary at its own database and config inside a temp directory.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the actionforge binary
#[allow(deprecated)]
fn actionforge_cmd() -> Command {
    Command::cargo_bin("actionforge").unwrap()
}

/// A temp dir holding an empty config file and a database path.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("actionforge.toml"), "").unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("actionforge.toml")
    }

    fn database(&self) -> PathBuf {
        self.dir.path().join("data").join("test.sqlite")
    }

    fn cmd(&self) -> Command {
        let mut cmd = actionforge_cmd();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config())
            .arg("--database")
            .arg(self.database());
        cmd
    }

    /// Create a user and return its ID.
    fn create_user(&self, name: &str) -> String {
        let output = self
            .cmd()
            .args(["create-user", "--name", name])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

fn show_user_json(ws: &Workspace, id: &str) -> serde_json::Value {
    let output = ws.cmd().args(["show-user", id, "--json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = actionforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = actionforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("actionforge"))
        .stdout(predicate::str::contains("create-user"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = actionforge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_migrate() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema version 1"));
    assert!(ws.database().exists());
}

#[test]
fn test_cli_create_user_without_name_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("create-user")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name can't be blank"));
}

#[test]
fn test_cli_create_user_and_show() {
    let ws = Workspace::new();
    let id = ws.create_user("alice");

    ws.cmd()
        .args(["show-user", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("User: alice"))
        .stdout(predicate::str::contains("Posts: 0"));
}

#[test]
fn test_cli_create_post_without_title_rolls_back() {
    let ws = Workspace::new();
    let id = ws.create_user("alice");

    ws.cmd()
        .args(["create-post", "--user", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title can't be blank"));

    let json = show_user_json(&ws, &id);
    assert_eq!(json["user"]["posts_count"], 0);
    assert_eq!(json["posts"].as_array().unwrap().len(), 0);
}

#[test]
fn test_cli_import_posts() {
    let ws = Workspace::new();
    let id = ws.create_user("alice");

    ws.cmd()
        .args(["import-posts", "--user", &id, "one", "two"])
        .assert()
        .success();

    let json = show_user_json(&ws, &id);
    assert_eq!(json["user"]["posts_count"], 2);
    assert_eq!(json["posts"][0]["title"], "one");
    assert_eq!(json["posts"][1]["title"], "two");
}

#[test]
fn test_cli_invalid_user_id() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["show-user", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_show_unknown_user() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["show-user", "00000000-0000-4000-8000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_validate_config() {
    let ws = Workspace::new();
    fs::write(ws.config(), "[database]\npool_size = 2\n").unwrap();

    ws.cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Pool size: 2"));
}

#[test]
fn test_cli_validate_rejects_bad_config() {
    let ws = Workspace::new();
    fs::write(ws.config(), "[database]\npool_size = 0\n").unwrap();

    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pool_size"));
}
