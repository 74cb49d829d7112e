//! Run configuration
//!
//! [`UpliftOptions`] is what the user asked for; [`RunConfig`] is the
//! validated form every operation receives by reference.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Channel, RepoSlug, validate_channel};
use std::collections::HashSet;
use tracing::debug;

/// Default top-level base branch
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Default file holding the nightly version
pub const DEFAULT_VERSION_FILE: &str = "package.json";

/// Default remote
pub const DEFAULT_REMOTE: &str = "origin";

/// Raw options as given on the command line
#[derive(Debug, Clone)]
pub struct UpliftOptions {
    /// Reviewer logins
    pub reviewers: Vec<String>,
    /// Assignee logins; empty means the token's owner
    pub owners: Vec<String>,
    /// Last channel to uplift to; nightly, or release when uplifting a PR
    pub uplift_to: Option<String>,
    /// Existing PR to uplift instead of the local branch
    pub uplift_using_pr: Option<String>,
    /// First channel to process
    pub start_from: String,
    /// Report instead of pushing or writing to GitHub
    pub dry_run: bool,
    /// Labels applied to every PR
    pub labels: Vec<String>,
    /// PR title; inferred from the first commit when absent
    pub title: Option<String>,
    /// Remote to fetch from and push to
    pub remote: String,
    /// Branch nightly PRs target
    pub base_branch: String,
    /// File whose `version` field names the nightly version
    pub version_file: String,
    /// Repository holding the version file, when not the target repository
    pub version_repo: Option<String>,
}

impl Default for UpliftOptions {
    fn default() -> Self {
        Self {
            reviewers: Vec::new(),
            owners: Vec::new(),
            uplift_to: None,
            uplift_using_pr: None,
            start_from: Channel::Nightly.to_string(),
            dry_run: false,
            labels: Vec::new(),
            title: None,
            remote: DEFAULT_REMOTE.to_string(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            version_file: DEFAULT_VERSION_FILE.to_string(),
            version_repo: None,
        }
    }
}

/// Options that can be checked without talking to GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    /// First channel to process
    pub start_from: Channel,
    /// Last channel to uplift to
    pub uplift_to: Channel,
    /// Existing PR number
    pub uplift_using_pr: Option<u64>,
    /// Explicit version repository
    pub version_repo: Option<RepoSlug>,
}

impl UpliftOptions {
    /// Validate channel names, PR number and repository slug
    pub fn validate(&self) -> Result<ValidatedOptions> {
        let explicit_target = self.uplift_to.as_deref().map(validate_channel).transpose()?;
        let start_from = validate_channel(&self.start_from)?;

        let uplift_using_pr = self
            .uplift_using_pr
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .map_err(|_| Error::Parse(format!("invalid pull request number \"{raw}\"")))
            })
            .transpose()?;

        // An existing PR starts past nightly, so the default target is the
        // last channel
        let uplift_to = explicit_target.unwrap_or(if uplift_using_pr.is_some() {
            Channel::Release
        } else {
            Channel::Nightly
        });

        let version_repo = self
            .version_repo
            .as_deref()
            .map(str::parse::<RepoSlug>)
            .transpose()?;

        Ok(ValidatedOptions {
            start_from,
            uplift_to,
            uplift_using_pr,
            version_repo,
        })
    }
}

/// Validated, resolved configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// First channel to process
    pub start_from: Channel,
    /// Last channel to uplift to
    pub uplift_to: Channel,
    /// Existing PR number
    pub uplift_using_pr: Option<u64>,
    /// Reviewer logins, validated
    pub reviewers: Vec<String>,
    /// Assignee logins, validated and never empty
    pub owners: Vec<String>,
    /// Labels, validated against the repository
    pub labels: Vec<String>,
    /// Explicit PR title
    pub title: Option<String>,
    /// Report instead of pushing or writing to GitHub
    pub dry_run: bool,
    /// Remote to fetch from and push to
    pub remote: String,
    /// Branch nightly PRs target
    pub base_branch: String,
    /// File whose `version` field names the nightly version
    pub version_file: String,
    /// Repository holding the version file
    pub version_repo: RepoSlug,
}

impl RunConfig {
    /// Validate options and resolve logins and labels against GitHub
    pub async fn resolve(options: &UpliftOptions, platform: &dyn PlatformService) -> Result<Self> {
        let validated = options.validate()?;

        let reviewers = validate_logins(platform, &options.reviewers).await?;
        let mut owners = validate_logins(platform, &options.owners).await?;
        if owners.is_empty() {
            owners.push(platform.authenticated_login().await?);
        }
        let labels = validate_labels(platform, &options.labels).await?;

        let config = Self {
            start_from: validated.start_from,
            uplift_to: validated.uplift_to,
            uplift_using_pr: validated.uplift_using_pr,
            reviewers,
            owners,
            labels,
            title: options
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string),
            dry_run: options.dry_run,
            remote: options.remote.clone(),
            base_branch: options.base_branch.clone(),
            version_file: options.version_file.clone(),
            version_repo: validated
                .version_repo
                .unwrap_or_else(|| platform.config().slug()),
        };
        debug!(?config, "resolved run configuration");
        Ok(config)
    }
}

/// Split comma-separated values, trimming and dropping blanks and duplicates
pub fn split_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.to_ascii_lowercase()))
        .map(ToString::to_string)
        .collect()
}

async fn validate_logins(platform: &dyn PlatformService, raw: &[String]) -> Result<Vec<String>> {
    let logins = split_list(raw);
    for login in &logins {
        if !platform.user_exists(login).await? {
            return Err(Error::UnknownUser(login.clone()));
        }
    }
    Ok(logins)
}

async fn validate_labels(platform: &dyn PlatformService, raw: &[String]) -> Result<Vec<String>> {
    let wanted = split_list(raw);
    if wanted.is_empty() {
        return Ok(wanted);
    }

    let existing = platform.list_labels().await?;
    wanted
        .into_iter()
        .map(|label| {
            existing
                .iter()
                .find(|e| e.eq_ignore_ascii_case(&label))
                .cloned()
                .ok_or(Error::UnknownLabel(label))
        })
        .collect()
}
