//! Pull request submission
//!
//! Opens one PR per propagated channel and attaches reviewers, milestone,
//! assignees and labels. Failures are contained per channel.

use crate::config::RunConfig;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::submit::plan::{PlanInputs, PrToCreate, plan_pull_request};
use crate::submit::ProgressCallback;
use crate::types::{Channel, ChannelBranchMap, Milestone, PropagationState, PullRequest};
use tracing::{debug, warn};

/// What happened to one channel's PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// PR opened and metadata attached
    Created(PullRequest),
    /// Dry run; the PR that would have been opened
    DryRun(PrToCreate),
    /// No milestone for the channel's branch
    SkippedNoMilestone,
}

/// Result of submission across all channels
#[derive(Debug, Clone, Default)]
pub struct SubmissionResult {
    /// Whether every channel was submitted or skipped without error
    pub success: bool,
    /// PRs that were created
    pub created_prs: Vec<(Channel, PullRequest)>,
    /// PRs that would be created (dry run)
    pub planned_prs: Vec<PrToCreate>,
    /// Channels skipped for lack of a milestone
    pub skipped: Vec<Channel>,
    /// Errors encountered (non-fatal)
    pub errors: Vec<String>,
}

/// Mutable state carried across channels
#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    /// Originating PR, referenced by uplift bodies
    pub origin_pr: Option<u64>,
    milestones: Option<Vec<Milestone>>,
}

impl SubmissionState {
    /// Start with a known originating PR (from `--uplift-using-pr`)
    pub fn with_origin(origin_pr: Option<u64>) -> Self {
        Self {
            origin_pr,
            milestones: None,
        }
    }
}

/// Run-wide inputs shared by every channel
#[derive(Debug, Clone)]
pub struct SubmitContext<'a> {
    /// Run configuration
    pub config: &'a RunConfig,
    /// Feature branch the run started from
    pub feature_branch: &'a str,
    /// Revision the feature branch was diffed against
    pub top_level_base: &'a str,
    /// Run title
    pub title: &'a str,
}

/// Milestone whose title starts with `"<branch> - "`
pub fn find_milestone<'a>(milestones: &'a [Milestone], branch: &str) -> Option<&'a Milestone> {
    let prefix = format!("{branch} - ");
    milestones.iter().find(|m| m.title.starts_with(&prefix))
}

/// Submit the PR for one channel
pub async fn submit_channel_pr(
    ctx: &SubmitContext<'_>,
    channel: Channel,
    remote_base: &str,
    head: &str,
    state: &mut SubmissionState,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> Result<SubmitOutcome> {
    if state.milestones.is_none() {
        state.milestones = Some(platform.list_milestones().await?);
    }
    let milestone = state
        .milestones
        .as_deref()
        .and_then(|all| find_milestone(all, remote_base))
        .cloned();

    let Some(milestone) = milestone else {
        progress
            .on_pr_skipped(
                channel,
                &format!("milestone for \"{remote_base}\" was not found"),
            )
            .await;
        return Ok(SubmitOutcome::SkippedNoMilestone);
    };

    let plan = plan_pull_request(&PlanInputs {
        channel,
        remote_base,
        head,
        feature_branch: ctx.feature_branch,
        top_level_base: ctx.top_level_base,
        base_branch: &ctx.config.base_branch,
        title: ctx.title,
        origin_pr: state.origin_pr,
    });
    debug!(?plan, milestone = milestone.number, "planned pull request");

    if ctx.config.dry_run {
        report_dry_run(ctx.config, &plan, &milestone, progress).await;
        return Ok(SubmitOutcome::DryRun(plan));
    }

    progress
        .on_message(&format!("({channel}) creating pull request"))
        .await;
    let pr = platform
        .create_pr(&plan.head, &plan.base, &plan.title, &plan.body)
        .await?;

    if plan.is_origin {
        state.origin_pr = Some(pr.number);
    }
    progress.on_pr_created(channel, &pr).await;

    platform
        .add_reviewers(pr.number, &ctx.config.reviewers)
        .await?;
    platform
        .set_issue_details(
            pr.number,
            milestone.number,
            &ctx.config.owners,
            &ctx.config.labels,
        )
        .await?;

    Ok(SubmitOutcome::Created(pr))
}

/// Report what would be done in a dry run
async fn report_dry_run(
    config: &RunConfig,
    plan: &PrToCreate,
    milestone: &Milestone,
    progress: &dyn ProgressCallback,
) {
    progress
        .on_message(&format!(
            "({}) would create PR {} → {}: {}",
            plan.channel, plan.head, plan.base, plan.title
        ))
        .await;
    if !config.reviewers.is_empty() {
        progress
            .on_message(&format!(
                "  would request reviews from {}",
                config.reviewers.join(", ")
            ))
            .await;
    }
    progress
        .on_message(&format!(
            "  would set milestone \"{}\", assignees [{}], labels [{}]",
            milestone.title,
            config.owners.join(", "),
            config.labels.join(", ")
        ))
        .await;
}

/// Submit PRs for every propagated channel, in channel order
///
/// A failing channel is reported and recorded; later channels are still
/// attempted.
pub async fn submit_all(
    ctx: &SubmitContext<'_>,
    branches: &ChannelBranchMap,
    propagated: &PropagationState,
    state: &mut SubmissionState,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> SubmissionResult {
    let mut result = SubmissionResult {
        success: true,
        ..SubmissionResult::default()
    };

    for (channel, head) in propagated.iter() {
        let remote_base = branches.get(channel);
        match submit_channel_pr(ctx, channel, remote_base, head, state, platform, progress).await {
            Ok(SubmitOutcome::Created(pr)) => result.created_prs.push((channel, pr)),
            Ok(SubmitOutcome::DryRun(plan)) => result.planned_prs.push(plan),
            Ok(SubmitOutcome::SkippedNoMilestone) => result.skipped.push(channel),
            Err(e) => {
                warn!(%channel, "pull request submission failed: {e}");
                progress.on_error(&e).await;
                result.errors.push(format!("({channel}) {e}"));
                result.success = false;
            }
        }
    }

    result
}
