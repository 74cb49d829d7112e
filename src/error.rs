//! Error types for uplift

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving, propagating, or submitting an uplift
#[derive(Debug, Error)]
pub enum Error {
    /// No usable GitHub token
    #[error("authentication error: {0}")]
    Auth(String),

    /// Channel name outside the fixed channel set
    #[error("channel name \"{0}\" is not valid (expected nightly, dev, beta or release)")]
    InvalidChannel(String),

    /// Version string that is not `major.minor.patch`
    #[error("malformed version \"{0}\": expected major.minor.patch")]
    MalformedVersion(String),

    /// Version branch whose minor component is already 0
    #[error("no previous version branch exists before \"{0}\"")]
    NoPreviousVersion(String),

    /// The feature branch has no commits relative to its comparison base
    #[error("no changes detected between \"{compare_from}\" and \"{branch}\"")]
    NoChangesDetected {
        /// Feature branch being propagated
        branch: String,
        /// Comparison base the diff was taken against
        compare_from: String,
    },

    /// A cherry-pick stopped; the channel branch needs manual resolution
    #[error(
        "cherry-pick of {sha} failed on branch \"{branch}\". Please resolve manually:\n{details}"
    )]
    CherryPickFailed {
        /// Channel branch left unresolved
        branch: String,
        /// Commit that failed to apply
        sha: String,
        /// Output from git
        details: String,
    },

    /// A git command exited unsuccessfully
    #[error("`git {command}` failed: {stderr}")]
    Git {
        /// Arguments passed to git
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// The index has staged changes that would be lost by branch switching
    #[error("staged changes found in {0}; commit or unstage them before running")]
    StagedChanges(String),

    /// GitHub API failure with context
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Raw octocrab failure
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Looking up the PR given via `--uplift-using-pr` failed
    #[error("API returned an error when looking up pull request #{number}: {message}")]
    PullRequestLookup {
        /// PR number requested
        number: u64,
        /// Underlying error message
        message: String,
    },

    /// Reviewer or owner login unknown to GitHub
    #[error("GitHub user \"{0}\" does not exist")]
    UnknownUser(String),

    /// Label not defined in the target repository
    #[error("label \"{0}\" does not exist in the repository")]
    UnknownLabel(String),

    /// PR base branch that maps to no release channel
    #[error("base branch \"{0}\" does not belong to any release channel")]
    UnknownBaseBranch(String),

    /// `--uplift-to` names a channel before the first processed one
    #[error("cannot uplift to {target}: processing starts at {start}")]
    UpliftTargetBeforeStart {
        /// Requested uplift target
        target: String,
        /// First channel in the processed range
        start: String,
    },

    /// Nothing is left to uplift after adjusting the channel range
    #[error("nothing to uplift: {0}")]
    NothingToUplift(String),

    /// One or more channels failed during PR submission
    #[error("pull request submission failed for {0} channel(s)")]
    SubmissionFailed(usize),

    /// Parse failure (URLs, numbers, payloads)
    #[error("parse error: {0}")]
    Parse(String),

    /// No remote pointing at GitHub
    #[error("no GitHub remote found")]
    NoSupportedRemotes,

    /// Named remote missing
    #[error("remote \"{0}\" not found")]
    RemoteNotFound(String),

    /// IO failure (spawning processes)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invariant violation inside uplift
    #[error("internal error: {0}")]
    Internal(String),
}
