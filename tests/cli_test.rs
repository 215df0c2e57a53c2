// tests/cli_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{Commit, Repository, Signature};
use tempfile::TempDir;

fn mreleaser(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mreleaser"))
        .arg("-C")
        .arg(dir)
        .args(["--output", "plain"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute mreleaser")
}

fn repo_with_commit(message: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    fs::write(dir.path().join("README.md"), "hello\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = Signature::now("Test User", "test@example.com").unwrap();
    let parents: Vec<&Commit> = Vec::new();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();

    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_version_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    for action in ["help", "-h", "--help"] {
        let output = mreleaser(dir.path(), &["version", action]);
        assert!(output.status.success(), "{} failed", action);
        assert!(stdout(&output).contains("version needs"));
        assert!(stdout(&output).contains("libgit2"));
    }
}

#[test]
fn test_unknown_action_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = mreleaser(dir.path(), &["version", "bogus"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid command"));
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn test_outside_repository_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = mreleaser(dir.path(), &["version"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Not a git repository"));
}

#[test]
fn test_version_prints_current_version() {
    let dir = repo_with_commit("fix: first fix");
    let output = mreleaser(dir.path(), &["version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0.0.0");
}

#[test]
fn test_needs_reports_bump() {
    let dir = repo_with_commit("feat: first feature");
    let output = mreleaser(dir.path(), &["version", "needs"]);
    assert!(output.status.success());

    assert_eq!(stdout(&output), "BUMPED=true\nVERSION=0.1.0\n");
    assert!(stderr(&output).contains("bump available"));
}

#[test]
fn test_needs_without_bump_exits_one() {
    let dir = repo_with_commit("docs: readme");
    let output = mreleaser(dir.path(), &["version", "needs"]);
    assert_eq!(output.status.code(), Some(1));

    assert_eq!(stdout(&output), "BUMPED=false\nVERSION=0.0.0\n");
    assert!(stderr(&output).contains("no bump needed"));
}

#[test]
fn test_needs_on_dirty_repository_exits_one() {
    let dir = repo_with_commit("fix: first fix");
    fs::write(dir.path().join("scratch.txt"), "wip").unwrap();

    let output = mreleaser(dir.path(), &["version", "needs"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("dirty repository"));
}

#[test]
fn test_tag_without_push_reports_new_version() {
    let dir = repo_with_commit("fix: first fix");
    let output = mreleaser(dir.path(), &["--no-push", "version", "tag"]);
    assert!(output.status.success(), "{}", stderr(&output));

    assert_eq!(stdout(&output), "BUMPED=true\nVERSION=0.0.1\n");

    let repo = Repository::open(dir.path()).unwrap();
    assert!(repo.find_reference("refs/tags/0.0.1").is_ok());

    let output = mreleaser(dir.path(), &["--no-push", "version", "tag"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("BUMPED=false"));
    assert!(out.contains("VERSION=0.0.1"));
}

#[test]
fn test_github_output_mode_writes_files() {
    let dir = repo_with_commit("feat: first feature");
    let ci = TempDir::new().unwrap();
    let output_file = ci.path().join("output");
    let env_file = ci.path().join("env");

    let output = Command::new(env!("CARGO_BIN_EXE_mreleaser"))
        .arg("-C")
        .arg(dir.path())
        .args(["--output", "github", "version", "needs"])
        .env("GITHUB_OUTPUT", &output_file)
        .env("GITHUB_ENV", &env_file)
        .output()
        .expect("Failed to execute mreleaser");
    assert!(output.status.success());

    let expected = "BUMPED=true\nVERSION=0.1.0\n";
    assert_eq!(fs::read_to_string(&output_file).unwrap(), expected);
    assert_eq!(fs::read_to_string(&env_file).unwrap(), expected);
}

#[test]
fn test_help_ignores_malformed_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mreleaser.toml"), "push = \"sometimes\"\n").unwrap();

    let output = mreleaser(dir.path(), &["version", "help"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("version needs"));
}

#[test]
fn test_malformed_config_is_reported_through_github_sink() {
    let dir = repo_with_commit("fix: first fix");
    fs::write(dir.path().join("mreleaser.toml"), "push = \"sometimes\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_mreleaser"))
        .arg("-C")
        .arg(dir.path())
        .args(["--output", "github", "version", "needs"])
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ENV")
        .output()
        .expect("Failed to execute mreleaser");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("::error::Error loading config"));
}
