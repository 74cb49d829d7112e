//! Uplift orchestration
//!
//! Resolve channel branches, choose the channel range, optionally check out
//! an existing PR, propagate each channel, push, then open the PRs.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::repo::GitRepo;
use crate::submit::execute::{SubmissionResult, SubmissionState, SubmitContext, submit_all};
use crate::submit::propagate::{PropagationRequest, propagate_channel};
use crate::submit::{Phase, ProgressCallback, PushStatus};
use crate::types::{Channel, ChannelBranchMap, PropagationState, PullRequestDetails};
use crate::version::remote_channel_branches;
use serde::Deserialize;
use tracing::{debug, info};

/// Result of a whole uplift run
#[derive(Debug, Clone)]
pub struct UpliftResult {
    /// Branch of every channel
    pub branches: ChannelBranchMap,
    /// Feature branch the commits came from
    pub feature_branch: String,
    /// Revision the feature branch was diffed against
    pub top_level_base: String,
    /// Local branch created for each processed channel
    pub propagated: PropagationState,
    /// Branches pushed (or that would be pushed in a dry run)
    pub pushed: Vec<String>,
    /// PR submission outcome
    pub submission: SubmissionResult,
}

#[derive(Deserialize)]
struct VersionManifest {
    version: String,
}

/// Channels to process and what to diff against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRange {
    /// Channels in processing order, ending at the uplift target
    pub channels: Vec<Channel>,
    /// Branch or commit the feature branch is diffed against
    pub top_level_base: String,
}

/// Channel range for a run starting at `start_from`
pub fn channel_range(
    start_from: Channel,
    uplift_to: Channel,
    branches: &ChannelBranchMap,
    base_branch: &str,
) -> Result<ChannelRange> {
    let top_level_base = if start_from.is_nightly() {
        base_branch.to_string()
    } else {
        branches.get(start_from).to_string()
    };
    Ok(ChannelRange {
        channels: limit_to_target(start_from.from_here(), uplift_to)?,
        top_level_base,
    })
}

/// Channel range when uplifting an existing PR
///
/// Starts at the channel after the PR's base. A merged PR is diffed
/// against the commit it was opened against.
pub fn channel_range_for_pr(
    pr: &PullRequestDetails,
    uplift_to: Channel,
    branches: &ChannelBranchMap,
    base_branch: &str,
) -> Result<ChannelRange> {
    let base_channel = if pr.base_ref == base_branch {
        Channel::Nightly
    } else {
        branches
            .channel_for_branch(&pr.base_ref)
            .ok_or_else(|| Error::UnknownBaseBranch(pr.base_ref.clone()))?
    };

    let remaining = &Channel::ALL[base_channel.index() + 1..];
    if remaining.is_empty() {
        return Err(Error::NothingToUplift(format!(
            "pull request #{} targets the {base_channel} channel",
            pr.number
        )));
    }

    let top_level_base = if pr.merged_at.is_some() {
        pr.base_sha.clone()
    } else {
        pr.base_ref.clone()
    };

    Ok(ChannelRange {
        channels: limit_to_target(remaining, uplift_to)?,
        top_level_base,
    })
}

fn limit_to_target(channels: &[Channel], uplift_to: Channel) -> Result<Vec<Channel>> {
    let Some(first) = channels.first() else {
        return Err(Error::NothingToUplift("no channels left to process".into()));
    };
    if uplift_to < *first {
        return Err(Error::UpliftTargetBeforeStart {
            target: uplift_to.to_string(),
            start: first.to_string(),
        });
    }
    Ok(channels
        .iter()
        .copied()
        .take_while(|c| *c <= uplift_to)
        .collect())
}

/// Local branch used when uplifting PR `number`
pub fn pr_branch_name(number: u64, head_ref: &str) -> String {
    format!("pr{number}_{head_ref}")
}

/// Nightly version from the version file at the base branch
pub async fn fetch_remote_version(
    config: &RunConfig,
    platform: &dyn PlatformService,
) -> Result<String> {
    let contents = platform
        .get_file_contents(
            &config.version_repo,
            &config.version_file,
            &config.base_branch,
        )
        .await?;
    let manifest: VersionManifest = serde_json::from_str(&contents)?;
    Ok(manifest.version)
}

/// Check out (or reset) the local branch matching an existing PR's head
async fn materialize_pr_branch(
    config: &RunConfig,
    repo: &GitRepo,
    pr: &PullRequestDetails,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    repo.fetch_pull_head(&config.remote, pr.number).await?;

    let local_branch = pr_branch_name(pr.number, &pr.head_ref);
    if repo.branch_sha(&local_branch).await?.is_some() {
        progress
            .on_message(&format!(
                "branch \"{local_branch}\" exists; resetting to {}/{} ({})",
                config.remote, pr.head_ref, pr.head_sha
            ))
            .await;
        repo.checkout(&local_branch).await?;
        repo.reset_hard(&pr.head_sha).await?;
    } else {
        progress
            .on_message(&format!(
                "creating branch \"{local_branch}\" using {}/{} ({})",
                config.remote, pr.head_ref, pr.head_sha
            ))
            .await;
        repo.checkout_new_branch(&local_branch, &pr.head_sha).await?;
    }
    Ok(())
}

/// Push the feature branch (fast-forward only) and the channel branches
///
/// Channel branches are rebuilt on every run, so they are force-pushed. The
/// feature branch belongs to the developer; a remote tip that is not an
/// ancestor of it rejects the push.
async fn push_branches(
    repo: &GitRepo,
    remote: &str,
    feature_branch: Option<&str>,
    channel_branches: &[String],
) -> Result<()> {
    if let Some(branch) = feature_branch {
        repo.push(remote, branch).await?;
    }
    repo.force_push(remote, channel_branches).await
}

/// Run a full uplift
#[allow(clippy::too_many_lines)]
pub async fn run_uplift(
    config: &RunConfig,
    repo: &GitRepo,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> Result<UpliftResult> {
    progress.on_phase(Phase::Resolving).await;

    repo.fetch(&config.remote).await?;
    if repo.has_staged_changes().await? {
        return Err(Error::StagedChanges(repo.root().display().to_string()));
    }

    let version = fetch_remote_version(config, platform).await?;
    let branches = remote_channel_branches(&version)?;
    info!(%version, ?branches, "resolved channel branches");

    let mut title = config.title.clone();
    let range = if let Some(number) = config.uplift_using_pr {
        let pr = platform
            .get_pull_request(number)
            .await
            .map_err(|e| Error::PullRequestLookup {
                number,
                message: e.to_string(),
            })?;
        let range = channel_range_for_pr(&pr, config.uplift_to, &branches, &config.base_branch)?;

        if let Some(merged_at) = pr.merged_at {
            progress
                .on_message(&format!(
                    "pr was already merged at {merged_at}; using \"{}\" instead of \"{}\"",
                    pr.base_sha, pr.base_ref
                ))
                .await;
        }
        if title.is_none() {
            title = Some(pr.title.clone());
        }

        materialize_pr_branch(config, repo, &pr, progress).await?;
        range
    } else {
        channel_range(
            config.start_from,
            config.uplift_to,
            &branches,
            &config.base_branch,
        )?
    };
    debug!(?range, "channel range");

    let feature_branch = repo.current_branch().await?;
    let compare_from = if platform.commit_exists(&range.top_level_base).await? {
        range.top_level_base.clone()
    } else {
        format!("{}/{}", config.remote, range.top_level_base)
    };

    let title = match title {
        Some(t) => t,
        None => repo
            .first_commit_subject(&compare_from)
            .await?
            .ok_or_else(|| Error::NoChangesDetected {
                branch: feature_branch.clone(),
                compare_from: compare_from.clone(),
            })?,
    };

    progress.on_phase(Phase::Propagating).await;
    progress
        .on_message(&format!(
            "NOTE: Commits are being detected by diffing \"{feature_branch}\" against \"{compare_from}\""
        ))
        .await;

    let mut propagated = PropagationState::default();
    let mut feature_push = None;
    let mut pending_push = Vec::new();
    for channel in &range.channels {
        let branch = propagate_channel(
            repo,
            &PropagationRequest {
                channel: *channel,
                remote: &config.remote,
                remote_base: branches.get(*channel),
                local_branch: &feature_branch,
                compare_from: &compare_from,
            },
            progress,
        )
        .await?;
        if channel.is_nightly() {
            feature_push = Some(branch.branch.clone());
        } else {
            pending_push.push(branch.branch.clone());
        }
        propagated.record(*channel, branch.branch);
    }

    let pushed: Vec<String> = feature_push
        .iter()
        .chain(&pending_push)
        .cloned()
        .collect();

    progress.on_phase(Phase::Pushing).await;
    if config.dry_run {
        progress.on_push(&pushed, PushStatus::Skipped).await;
    } else {
        progress.on_push(&pushed, PushStatus::Started).await;
        if let Err(e) =
            push_branches(repo, &config.remote, feature_push.as_deref(), &pending_push).await
        {
            progress
                .on_push(&pushed, PushStatus::Failed(e.to_string()))
                .await;
            return Err(e);
        }
        progress.on_push(&pushed, PushStatus::Success).await;
    }

    progress.on_phase(Phase::CreatingPrs).await;
    let ctx = SubmitContext {
        config,
        feature_branch: &feature_branch,
        top_level_base: &range.top_level_base,
        title: &title,
    };
    let mut state = SubmissionState::with_origin(config.uplift_using_pr);
    let submission = submit_all(&ctx, &branches, &propagated, &mut state, platform, progress).await;

    progress.on_phase(Phase::Complete).await;

    Ok(UpliftResult {
        branches,
        feature_branch,
        top_level_base: range.top_level_base,
        propagated,
        pushed,
        submission,
    })
}
