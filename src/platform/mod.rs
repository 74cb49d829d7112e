//! GitHub platform service
//!
//! Everything the uplift flow needs from the GitHub REST API, behind a
//! trait so the orchestration can run against a mock.

mod detection;
mod factory;
mod github;

pub use detection::{is_github_url, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Milestone, PlatformConfig, PullRequest, PullRequestDetails, RepoSlug};
use async_trait::async_trait;

/// Platform service trait for PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Decoded contents of a file at a ref in any repository
    async fn get_file_contents(&self, repo: &RepoSlug, path: &str, git_ref: &str)
    -> Result<String>;

    /// Fetch an existing PR by number
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails>;

    /// Whether `reference` names a commit (as opposed to a branch)
    ///
    /// A "not found" response maps to `Ok(false)`.
    async fn commit_exists(&self, reference: &str) -> Result<bool>;

    /// Create a new PR
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Request reviews on a PR
    async fn add_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()>;

    /// Open milestones of the repository
    async fn list_milestones(&self) -> Result<Vec<Milestone>>;

    /// Set milestone, assignees and labels on a PR's issue
    async fn set_issue_details(
        &self,
        pr_number: u64,
        milestone: u64,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()>;

    /// Whether a GitHub login exists
    async fn user_exists(&self, login: &str) -> Result<bool>;

    /// Login owning the token
    async fn authenticated_login(&self) -> Result<String>;

    /// Label names defined in the repository
    async fn list_labels(&self) -> Result<Vec<String>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
