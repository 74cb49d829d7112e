//! Throwaway git repositories for propagation tests
//!
//! Layout: a bare `origin.git` holding `master` plus the 0.59.x, 0.58.x and
//! 0.57.x channel branches, and a `work` clone checked out on `feature`
//! with two commits on top of `master`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use uplift::repo::GitRepo;

pub const FEATURE: &str = "feature";
pub const CHANNEL_BRANCHES: [&str; 3] = ["0.59.x", "0.58.x", "0.57.x"];

/// Run git in `dir`, panicking with stderr on failure
pub fn git_in(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub struct GitFixture {
    _dir: TempDir,
    pub work: PathBuf,
    pub origin: PathBuf,
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        let origin = dir.path().join("origin.git");
        fs::create_dir(&work).unwrap();

        git_in(dir.path(), &["init", "-q", "--bare", "-b", "master", "origin.git"]);
        git_in(&work, &["init", "-q", "-b", "master"]);
        git_in(&work, &["config", "user.name", "Test User"]);
        git_in(&work, &["config", "user.email", "test@example.com"]);
        git_in(&work, &["config", "commit.gpgsign", "false"]);

        let fixture = Self {
            _dir: dir,
            work,
            origin,
        };

        fixture.commit("README.md", "brave-core\n", "Initial commit");
        for branch in CHANNEL_BRANCHES {
            fixture.git(&["checkout", "-q", "-b", branch, "master"]);
            fixture.commit("CHANNEL", branch, &format!("Start {branch}"));
        }
        fixture.git(&["checkout", "-q", "master"]);

        let origin_path = fixture.origin.display().to_string();
        fixture.git(&["remote", "add", "origin", &origin_path]);
        let mut push = vec!["push", "-q", "origin", "master"];
        push.extend(CHANNEL_BRANCHES);
        fixture.git(&push);

        fixture.git(&["checkout", "-q", "-b", FEATURE, "master"]);
        fixture.commit("fix.txt", "fixed\n", "Fix crash on startup");
        fixture.commit("test.txt", "covered\n", "Add regression test");

        fixture
    }

    pub async fn repo(&self) -> GitRepo {
        GitRepo::open(&self.work).await.unwrap()
    }

    /// Run git in the work tree
    pub fn git(&self, args: &[&str]) -> String {
        git_in(&self.work, args)
    }

    /// Commit a single file on the checked out branch
    pub fn commit(&self, file: &str, content: &str, message: &str) {
        fs::write(self.work.join(file), content).unwrap();
        self.git(&["add", file]);
        self.git(&["commit", "-q", "-m", message]);
    }

    /// Add a commit to a channel branch on origin, then return to `feature`
    pub fn advance_remote_branch(&self, branch: &str, file: &str, content: &str) {
        self.git(&["checkout", "-q", branch]);
        self.commit(file, content, &format!("Diverge {branch}"));
        self.git(&["push", "-q", "origin", branch]);
        self.git(&["checkout", "-q", FEATURE]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Whether a local branch exists in the work tree
    pub fn has_branch(&self, branch: &str) -> bool {
        Command::new("git")
            .current_dir(&self.work)
            .args(["rev-parse", "-q", "--verify", &format!("refs/heads/{branch}")])
            .output()
            .unwrap()
            .status
            .success()
    }

    /// Commit a branch points at on origin, if it was pushed
    pub fn origin_sha(&self, branch: &str) -> Option<String> {
        let output = Command::new("git")
            .current_dir(&self.origin)
            .args(["rev-parse", "-q", "--verify", &format!("refs/heads/{branch}")])
            .output()
            .unwrap();
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Subjects of `range`, oldest first
    pub fn subjects(&self, range: &str) -> Vec<String> {
        self.git(&["log", "--reverse", "--pretty=format:%s", range])
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Tree object of a revision
    pub fn tree(&self, rev: &str) -> String {
        self.rev(&format!("{rev}^{{tree}}"))
    }
}
