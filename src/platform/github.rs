//! GitHub platform service implementation
//!
//! Responses are decoded into small local records so only the fields the
//! uplift flow relies on are required to be present.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Milestone, PlatformConfig, PullRequest, PullRequestDetails, RepoSlug};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use octocrab::{Octocrab, Page};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const PAGE_SIZE: &str = "100";

#[derive(Deserialize)]
struct ContentRecord {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Deserialize)]
struct RefRecord {
    #[serde(rename = "ref")]
    ref_field: String,
    sha: String,
}

#[derive(Deserialize)]
struct PullRecord {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    head: RefRecord,
    base: RefRecord,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct CommitRecord {
    sha: String,
}

#[derive(Deserialize)]
struct LoginRecord {
    login: String,
}

#[derive(Deserialize)]
struct LabelRecord {
    name: String,
}

impl From<PullRecord> for PullRequest {
    fn from(pr: PullRecord) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url.unwrap_or_default(),
            base_ref: pr.base.ref_field,
            head_ref: pr.head.ref_field,
            title: pr.title.unwrap_or_default(),
        }
    }
}

impl From<PullRecord> for PullRequestDetails {
    fn from(pr: PullRecord) -> Self {
        Self {
            number: pr.number,
            title: pr.title.unwrap_or_default().trim().to_string(),
            head_ref: pr.head.ref_field,
            head_sha: pr.head.sha,
            base_ref: pr.base.ref_field,
            base_sha: pr.base.sha,
            merged_at: pr.merged_at,
        }
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn looks_like_sha(reference: &str) -> bool {
    (7..=40).contains(&reference.len()) && reference.bytes().all(|b| b.is_ascii_hexdigit())
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// Enterprise hosts use `https://{host}/api/v3`.
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let base_uri = config
            .host
            .as_ref()
            .map(|h| format!("https://{h}/api/v3"));
        Self::build(token, config, base_uri.as_deref())
    }

    /// Create a service against an explicit API base URI
    pub fn with_base_uri(token: &str, config: PlatformConfig, base_uri: &str) -> Result<Self> {
        Self::build(token, config, Some(base_uri))
    }

    fn build(token: &str, config: PlatformConfig, base_uri: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn repo_route(&self, rest: &str) -> String {
        format!(
            "/repos/{}/{}/{rest}",
            urlencoding::encode(&self.config.owner),
            urlencoding::encode(&self.config.repo)
        )
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_file_contents(
        &self,
        repo: &RepoSlug,
        path: &str,
        git_ref: &str,
    ) -> Result<String> {
        let encoded_path = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let route = format!(
            "/repos/{}/{}/contents/{encoded_path}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        );
        debug!(%route, git_ref, "fetching file contents");

        let record: ContentRecord = self.client.get(route, Some(&[("ref", git_ref)])).await?;

        if !record.encoding.is_empty() && record.encoding != "base64" {
            return Err(Error::GitHubApi(format!(
                "unsupported content encoding \"{}\" for {path}",
                record.encoding
            )));
        }

        let packed: String = record
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(packed)
            .map_err(|e| Error::Parse(format!("invalid base64 in {path}: {e}")))?;

        String::from_utf8(bytes).map_err(|e| Error::Parse(format!("{path} is not UTF-8: {e}")))
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        let route = self.repo_route(&format!("pulls/{number}"));
        debug!(%route, "fetching pull request");
        let record: PullRecord = self.client.get(route, None::<&()>).await?;
        Ok(record.into())
    }

    async fn commit_exists(&self, reference: &str) -> Result<bool> {
        if !looks_like_sha(reference) {
            return Ok(false);
        }

        let route = self.repo_route(&format!("git/commits/{reference}"));
        debug!(%route, "checking whether ref is a commit");

        match self.client.get::<CommitRecord, _, _>(route, None::<&()>).await {
            Ok(commit) => Ok(commit.sha.starts_with(reference) || reference.starts_with(&commit.sha)),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        let route = self.repo_route("pulls");
        debug!(%route, head, base, title, "creating pull request");

        let record: PullRecord = self
            .client
            .post(
                route,
                Some(&json!({
                    "title": title,
                    "head": head,
                    "base": base,
                    "body": body,
                })),
            )
            .await?;

        Ok(record.into())
    }

    async fn add_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        if reviewers.is_empty() {
            return Ok(());
        }

        let route = self.repo_route(&format!("pulls/{pr_number}/requested_reviewers"));
        debug!(%route, ?reviewers, "requesting reviews");

        let _: serde_json::Value = self
            .client
            .post(route, Some(&json!({ "reviewers": reviewers })))
            .await?;
        Ok(())
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>> {
        let route = self.repo_route("milestones");
        debug!(%route, "listing milestones");

        let first: Page<Milestone> = self
            .client
            .get(route, Some(&[("state", "open"), ("per_page", PAGE_SIZE)]))
            .await?;
        Ok(self.client.all_pages(first).await?)
    }

    async fn set_issue_details(
        &self,
        pr_number: u64,
        milestone: u64,
        assignees: &[String],
        labels: &[String],
    ) -> Result<()> {
        let route = self.repo_route(&format!("issues/{pr_number}"));
        debug!(%route, milestone, ?assignees, ?labels, "setting issue details");

        let _: serde_json::Value = self
            .client
            .patch(
                route,
                Some(&json!({
                    "milestone": milestone,
                    "assignees": assignees,
                    "labels": labels,
                })),
            )
            .await?;
        Ok(())
    }

    async fn user_exists(&self, login: &str) -> Result<bool> {
        let route = format!("/users/{}", urlencoding::encode(login));
        match self.client.get::<LoginRecord, _, _>(route, None::<&()>).await {
            Ok(user) => Ok(user.login.eq_ignore_ascii_case(login)),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticated_login(&self) -> Result<String> {
        let user: LoginRecord = self
            .client
            .get("/user", None::<&()>)
            .await
            .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;
        Ok(user.login)
    }

    async fn list_labels(&self) -> Result<Vec<String>> {
        let route = self.repo_route("labels");
        debug!(%route, "listing labels");

        let first: Page<LabelRecord> = self
            .client
            .get(route, Some(&[("per_page", PAGE_SIZE)]))
            .await?;
        let labels = self.client.all_pages(first).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
