//! Git working copy access
//!
//! Every operation runs `git` with an explicit working directory, so the
//! process-wide current directory is never changed.

use crate::error::{Error, Result};
use crate::types::GitRemote;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Outcome of a single cherry-pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickResult {
    /// Commit applied; first line of git's output
    Applied(String),
    /// Commit did not apply; git's combined output
    Failed(String),
}

/// A git working copy rooted at a known directory
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the working copy containing `path`
    pub async fn open(path: &Path) -> Result<Self> {
        let unresolved = Self {
            root: path.to_path_buf(),
        };
        let toplevel = unresolved.run(&["rev-parse", "--show-toplevel"]).await?;
        Ok(Self {
            root: PathBuf::from(toplevel),
        })
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(root = %self.root.display(), "git {}", args.join(" "));
        Ok(Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .await?)
    }

    /// Run git, returning trimmed stdout on success
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(Error::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Configured remotes
    pub async fn remotes(&self) -> Result<Vec<GitRemote>> {
        let names = self.run(&["remote"]).await?;
        let mut remotes = Vec::new();
        for name in names.lines().filter(|name| !name.is_empty()) {
            let url = self.run(&["remote", "get-url", name]).await?;
            remotes.push(GitRemote {
                name: name.to_string(),
                url,
            });
        }
        Ok(remotes)
    }

    /// Fetch all branches from a remote
    pub async fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", remote]).await.map(drop)
    }

    /// Fetch the head of a GitHub pull request so its commits exist locally
    pub async fn fetch_pull_head(&self, remote: &str, number: u64) -> Result<()> {
        self.run(&["fetch", remote, &format!("pull/{number}/head")])
            .await
            .map(drop)
    }

    /// Whether the index holds staged changes
    pub async fn has_staged_changes(&self) -> Result<bool> {
        let output = self.output(&["diff", "--cached", "--quiet"]).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::Git {
                command: "diff --cached --quiet".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    /// Name of the checked out branch
    pub async fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    /// Commit a local branch points at, or None if it does not exist
    pub async fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        let output = self
            .output(&["rev-parse", "-q", "--verify", &format!("refs/heads/{branch}")])
            .await?;
        if output.status.success() {
            let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok((!sha.is_empty()).then_some(sha))
        } else {
            Ok(None)
        }
    }

    /// Check out an existing branch
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).await.map(drop)
    }

    /// Check out an existing branch, discarding any conflicted index state
    pub async fn force_checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--force", branch]).await.map(drop)
    }

    /// Create a branch at `start_point` and check it out
    pub async fn checkout_new_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.run(&["checkout", "--no-track", "-b", branch, start_point])
            .await
            .map(drop)
    }

    /// Hard-reset the checked out branch to a revision
    pub async fn reset_hard(&self, rev: &str) -> Result<()> {
        self.run(&["reset", "--hard", rev]).await.map(drop)
    }

    /// Commits in `from..HEAD`, oldest first
    pub async fn commits_since(&self, from: &str) -> Result<Vec<String>> {
        let log = self
            .run(&["log", &format!("{from}..HEAD"), "--pretty=format:%H", "--reverse"])
            .await?;
        Ok(log
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Subject line of the oldest commit in `from..HEAD`
    pub async fn first_commit_subject(&self, from: &str) -> Result<Option<String>> {
        let log = self
            .run(&["log", &format!("{from}..HEAD"), "--pretty=format:%s", "--reverse"])
            .await?;
        Ok(log
            .lines()
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string))
    }

    /// Cherry-pick one commit onto the checked out branch
    pub async fn cherry_pick(&self, sha: &str) -> Result<CherryPickResult> {
        let output = self.output(&["cherry-pick", sha]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if output.status.success() {
            let summary = stdout.lines().next().unwrap_or_default().trim().to_string();
            return Ok(CherryPickResult::Applied(summary));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(CherryPickResult::Failed(
            format!("{}\n{}", stdout.trim(), stderr.trim())
                .trim()
                .to_string(),
        ))
    }

    /// Push a branch; rejected unless the remote branch fast-forwards
    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await.map(drop)
    }

    /// Force-push branches to a remote in one invocation
    pub async fn force_push(&self, remote: &str, branches: &[String]) -> Result<()> {
        if branches.is_empty() {
            return Ok(());
        }
        let mut args = vec!["push", "--force", remote];
        args.extend(branches.iter().map(String::as_str));
        self.run(&args).await.map(drop)
    }
}
