//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use uplift::error::{Error, Result};
use uplift::platform::PlatformService;
use uplift::types::{Milestone, PlatformConfig, PullRequest, PullRequestDetails, RepoSlug};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `add_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewersCall {
    pub pr_number: u64,
    pub reviewers: Vec<String>,
}

/// Call record for `set_issue_details`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetailsCall {
    pub pr_number: u64,
    pub milestone: u64,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
}

/// Hand-written mock of the GitHub service
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Configurable version file, milestones, users, labels and PRs
/// - Error injection for `create_pr`, optionally only for one base branch
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    version_contents: Mutex<String>,
    milestones: Mutex<Vec<Milestone>>,
    pull_requests: Mutex<HashMap<u64, PullRequestDetails>>,
    commits: Mutex<HashSet<String>>,
    users: Mutex<HashSet<String>>,
    labels: Mutex<Vec<String>>,
    login: String,
    // Call tracking
    file_calls: Mutex<Vec<(RepoSlug, String, String)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    reviewers_calls: Mutex<Vec<ReviewersCall>>,
    issue_calls: Mutex<Vec<IssueDetailsCall>>,
    milestone_calls: AtomicU64,
    // Error injection
    error_on_create_pr: Mutex<Option<(Option<String>, String)>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config and nightly version
    pub fn with_config(config: PlatformConfig, version: &str) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            version_contents: Mutex::new(format!("{{\"name\": \"brave-core\", \"version\": \"{version}\"}}")),
            milestones: Mutex::new(Vec::new()),
            pull_requests: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashSet::new()),
            users: Mutex::new(HashSet::new()),
            labels: Mutex::new(Vec::new()),
            login: "tester".to_string(),
            file_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            reviewers_calls: Mutex::new(Vec::new()),
            issue_calls: Mutex::new(Vec::new()),
            milestone_calls: AtomicU64::new(0),
            error_on_create_pr: Mutex::new(None),
        }
    }

    // === Configuration ===

    /// Replace the raw contents returned for the version file
    pub fn set_version_contents(&self, contents: &str) {
        *self.version_contents.lock().unwrap() = contents.to_string();
    }

    /// Set the open milestones
    pub fn set_milestones(&self, milestones: Vec<Milestone>) {
        *self.milestones.lock().unwrap() = milestones;
    }

    /// Register an existing pull request
    pub fn add_pull_request(&self, pr: PullRequestDetails) {
        self.pull_requests.lock().unwrap().insert(pr.number, pr);
    }

    /// Make `commit_exists` report true for a reference
    pub fn add_commit(&self, sha: &str) {
        self.commits.lock().unwrap().insert(sha.to_string());
    }

    /// Register GitHub logins
    pub fn add_users(&self, logins: &[&str]) {
        let mut users = self.users.lock().unwrap();
        users.extend(logins.iter().map(|l| l.to_ascii_lowercase()));
    }

    /// Register repository labels
    pub fn set_labels(&self, labels: &[&str]) {
        *self.labels.lock().unwrap() = labels.iter().map(ToString::to_string).collect();
    }

    // === Error injection ===

    /// Make every `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some((None, msg.to_string()));
    }

    /// Make `create_pr` fail only for PRs against `base`
    pub fn fail_create_pr_for_base(&self, base: &str, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some((Some(base.to_string()), msg.to_string()));
    }

    // === Call verification ===

    pub fn get_file_calls(&self) -> Vec<(RepoSlug, String, String)> {
        self.file_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_reviewers_calls(&self) -> Vec<ReviewersCall> {
        self.reviewers_calls.lock().unwrap().clone()
    }

    pub fn get_issue_calls(&self) -> Vec<IssueDetailsCall> {
        self.issue_calls.lock().unwrap().clone()
    }

    pub fn milestone_call_count(&self) -> u64 {
        self.milestone_calls.load(Ordering::SeqCst)
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that nothing was written to GitHub
    pub fn assert_no_writes(&self) {
        assert!(self.get_create_pr_calls().is_empty());
        assert!(self.get_reviewers_calls().is_empty());
        assert!(self.get_issue_calls().is_empty());
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_file_contents(
        &self,
        repo: &RepoSlug,
        path: &str,
        git_ref: &str,
    ) -> Result<String> {
        self.file_calls
            .lock()
            .unwrap()
            .push((repo.clone(), path.to_string(), git_ref.to_string()));
        Ok(self.version_contents.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        self.pull_requests
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi("Not Found".to_string()))
    }

    async fn commit_exists(&self, reference: &str) -> Result<bool> {
        Ok(self.commits.lock().unwrap().contains(reference))
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some((only_base, msg)) = self.error_on_create_pr.lock().unwrap().as_ref() {
            if only_base.as_deref().is_none_or(|b| b == base) {
                return Err(Error::GitHubApi(msg.clone()));
            }
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    async fn add_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        self.reviewers_calls.lock().unwrap().push(ReviewersCall {
            pr_number,
            reviewers: reviewers.to_vec(),
        });
        Ok(())
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>> {
        self.milestone_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.milestones.lock().unwrap().clone())
    }

    async fn set_issue_details(
        &self,
        pr_number: u64,
        milestone: u64,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()> {
        self.issue_calls.lock().unwrap().push(IssueDetailsCall {
            pr_number,
            milestone,
            assignees: assignees.to_vec(),
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn user_exists(&self, login: &str) -> Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .contains(&login.to_ascii_lowercase()))
    }

    async fn authenticated_login(&self) -> Result<String> {
        Ok(self.login.clone())
    }

    async fn list_labels(&self) -> Result<Vec<String>> {
        Ok(self.labels.lock().unwrap().clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
