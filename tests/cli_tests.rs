//! Command line behavior that fails before any GitHub call

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn uplift() -> Command {
    let mut cmd = Command::cargo_bin("uplift").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
}

fn github_checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q", "-b", "master"]);
    git(
        dir.path(),
        &["remote", "add", "origin", "git@github.com:test/repo.git"],
    );
    dir
}

#[test]
fn test_help_lists_options() {
    uplift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--uplift-to"))
        .stdout(predicate::str::contains("--uplift-using-pr"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_invalid_channel_exits_nonzero() {
    let dir = github_checkout();
    uplift()
        .args(["--uplift-to", "stable", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"stable\" is not valid"));
}

#[test]
fn test_invalid_pr_number_exits_nonzero() {
    let dir = github_checkout();
    uplift()
        .args(["--uplift-using-pr", "abc", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pull request number"));
}

#[test]
fn test_missing_remote_exits_nonzero() {
    let dir = github_checkout();
    uplift()
        .args(["--remote", "upstream", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote \"upstream\" not found"));
}

#[test]
fn test_outside_repository_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    uplift()
        .arg("--path")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rev-parse"));
}

/// Directory holding only a link to the real `git`, so `npm` and `gh` are
/// not reachable
#[cfg(unix)]
fn git_only_path() -> (TempDir, PathBuf) {
    let git = std::env::var_os("PATH")
        .iter()
        .flat_map(std::env::split_paths)
        .map(|dir| dir.join("git"))
        .find(|candidate| candidate.is_file())
        .expect("git on PATH");
    let bin = TempDir::new().unwrap();
    std::os::unix::fs::symlink(&git, bin.path().join("git")).unwrap();
    let path = bin.path().to_path_buf();
    (bin, path)
}

#[cfg(unix)]
#[test]
fn test_missing_token_exits_nonzero() {
    let dir = github_checkout();
    let (_bin, path) = git_only_path();

    uplift()
        .env("PATH", &path)
        .arg("--path")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no valid GitHub token"));
}

#[cfg(unix)]
#[test]
fn test_pr_flow_without_target_passes_validation() {
    let dir = github_checkout();
    let (_bin, path) = git_only_path();

    uplift()
        .env("PATH", &path)
        .args(["--uplift-using-pr", "7", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid GitHub token"))
        .stderr(predicate::str::contains("cannot uplift").not());
}
