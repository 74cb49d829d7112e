//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, tests, etc.) to receive
//! progress updates while an uplift runs.

use crate::error::Error;
use crate::types::{Channel, PullRequest};
use async_trait::async_trait;
use std::fmt;

/// Uplift phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching, reading the version, resolving channel branches
    Resolving,
    /// Creating channel branches and cherry-picking
    Propagating,
    /// Pushing branches to the remote
    Pushing,
    /// Opening pull requests
    CreatingPrs,
    /// Uplift complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolving => "Resolving channel branches",
            Self::Propagating => "Creating branches",
            Self::Pushing => "Pushing local branches to remote",
            Self::CreatingPrs => "Creating the pull requests",
            Self::Complete => "Done",
        })
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Dry run, nothing pushed
    Skipped,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::Skipped => f.write_str("skipped (dry run)"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// How a channel branch was prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchPreparation {
    /// The feature branch itself (nightly)
    FeatureBranch,
    /// Existing branch reset to the remote base
    Reset,
    /// New branch created from the remote base
    Created,
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during an uplift.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called once a channel's local branch exists at its starting point
    async fn on_branch_ready(
        &self,
        channel: Channel,
        branch: &str,
        base: &str,
        how: BranchPreparation,
    );

    /// Called for each commit cherry-picked onto a channel branch
    async fn on_commit_picked(&self, channel: Channel, sha: &str, summary: &str);

    /// Called for the batch push of all pending branches
    async fn on_push(&self, branches: &[String], status: PushStatus);

    /// Called when a PR is created
    async fn on_pr_created(&self, channel: Channel, pr: &PullRequest);

    /// Called when a channel's PR is skipped (not an error)
    async fn on_pr_skipped(&self, channel: Channel, reason: &str);

    /// Called when an error occurs (non-fatal)
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_branch_ready(
        &self,
        _channel: Channel,
        _branch: &str,
        _base: &str,
        _how: BranchPreparation,
    ) {
    }
    async fn on_commit_picked(&self, _channel: Channel, _sha: &str, _summary: &str) {}
    async fn on_push(&self, _branches: &[String], _status: PushStatus) {}
    async fn on_pr_created(&self, _channel: Channel, _pr: &PullRequest) {}
    async fn on_pr_skipped(&self, _channel: Channel, _reason: &str) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
