//! Uplift engine
//!
//! Propagates a feature branch across release channels and submits one PR
//! per channel:
//! 1. Propagation - cherry-pick onto each channel branch locally
//! 2. Planning - decide base, title and body of each PR
//! 3. Execution - push, then open PRs and attach metadata

mod execute;
mod orchestrate;
mod plan;
mod progress;
mod propagate;

pub use execute::{
    SubmissionResult, SubmissionState, SubmitContext, SubmitOutcome, find_milestone,
    submit_all, submit_channel_pr,
};
pub use orchestrate::{
    ChannelRange, UpliftResult, channel_range, channel_range_for_pr, fetch_remote_version,
    pr_branch_name, run_uplift,
};
pub use plan::{PLACEHOLDER_BODY, PlanInputs, PrToCreate, plan_pull_request};
pub use progress::{BranchPreparation, NoopProgress, Phase, ProgressCallback, PushStatus};
pub use propagate::{
    ChannelState, PropagatedBranch, PropagationRequest, channel_branch_name, propagate_channel,
};
