//! Test data factories for uplift types

#![allow(dead_code)]

use chrono::Utc;
use uplift::config::{DEFAULT_BASE_BRANCH, DEFAULT_REMOTE, DEFAULT_VERSION_FILE, RunConfig};
use uplift::types::{Channel, Milestone, PlatformConfig, PullRequest, PullRequestDetails};

/// Create a pull request with default values
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("PR for {head}"),
    }
}

/// Details of an existing pull request
pub fn make_pr_details(
    number: u64,
    head: &str,
    head_sha: &str,
    base: &str,
    base_sha: &str,
    merged: bool,
) -> PullRequestDetails {
    PullRequestDetails {
        number,
        title: format!("PR for {head}"),
        head_ref: head.to_string(),
        head_sha: head_sha.to_string(),
        base_ref: base.to_string(),
        base_sha: base_sha.to_string(),
        merged_at: merged.then(Utc::now),
    }
}

/// Create a GitHub platform config
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

pub fn milestone(number: u64, title: &str) -> Milestone {
    Milestone {
        number,
        title: title.to_string(),
    }
}

/// Open milestones for every channel of nightly 0.60.x
pub fn channel_milestones() -> Vec<Milestone> {
    vec![
        milestone(10, "0.60.x - Nightly"),
        milestone(11, "0.59.x - Dev"),
        milestone(12, "0.58.x - Beta"),
        milestone(13, "0.57.x - Release"),
    ]
}

/// Run configuration uplifting from nightly to `uplift_to`
pub fn run_config(uplift_to: Channel) -> RunConfig {
    RunConfig {
        start_from: Channel::Nightly,
        uplift_to,
        uplift_using_pr: None,
        reviewers: vec!["alice".to_string()],
        owners: vec!["tester".to_string()],
        labels: Vec::new(),
        title: None,
        dry_run: false,
        remote: DEFAULT_REMOTE.to_string(),
        base_branch: DEFAULT_BASE_BRANCH.to_string(),
        version_file: DEFAULT_VERSION_FILE.to_string(),
        version_repo: github_config().slug(),
    }
}
