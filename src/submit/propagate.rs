//! Branch propagation
//!
//! Recreates the feature branch's commits on top of each channel's remote
//! branch. The feature branch is always restored to its original tip.

use crate::error::{Error, Result};
use crate::repo::{CherryPickResult, GitRepo};
use crate::submit::{BranchPreparation, ProgressCallback};
use crate::types::Channel;
use tracing::{debug, warn};

/// Where a channel is in propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Nothing done yet
    NotStarted,
    /// Local branch exists at the remote base
    LocalBranchReady,
    /// All commits applied
    CherryPicked,
    /// A cherry-pick stopped partway
    Failed,
}

/// Inputs for propagating one channel
#[derive(Debug, Clone)]
pub struct PropagationRequest<'a> {
    /// Channel being processed
    pub channel: Channel,
    /// Remote holding the channel branches
    pub remote: &'a str,
    /// Remote branch of this channel, e.g. `0.59.x`
    pub remote_base: &'a str,
    /// Feature branch holding the commits
    pub local_branch: &'a str,
    /// Revision the feature branch is diffed against
    pub compare_from: &'a str,
}

/// A channel branch ready to push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagatedBranch {
    /// Channel processed
    pub channel: Channel,
    /// Local branch holding the channel's commits
    pub branch: String,
    /// Final state
    pub state: ChannelState,
}

/// Deterministic local branch name for a channel
pub fn channel_branch_name(remote_base: &str, local_branch: &str) -> String {
    format!("{remote_base}_{local_branch}")
}

fn transition(channel: Channel, state: &mut ChannelState, next: ChannelState) {
    debug!(%channel, from = ?*state, to = ?next, "channel state");
    *state = next;
}

/// Propagate the feature branch's commits onto one channel
///
/// Nightly uses the feature branch as-is. Every other channel gets
/// `<remote_base>_<local_branch>`, reset to `<remote>/<remote_base>` when it
/// already exists, with the commits of `compare_from..HEAD` cherry-picked
/// in order. A failed cherry-pick is left for manual resolution.
pub async fn propagate_channel(
    repo: &GitRepo,
    request: &PropagationRequest<'_>,
    progress: &dyn ProgressCallback,
) -> Result<PropagatedBranch> {
    let channel = request.channel;
    let mut state = ChannelState::NotStarted;

    if channel.is_nightly() {
        transition(channel, &mut state, ChannelState::CherryPicked);
        progress
            .on_branch_ready(
                channel,
                request.local_branch,
                request.remote_base,
                BranchPreparation::FeatureBranch,
            )
            .await;
        return Ok(PropagatedBranch {
            channel,
            branch: request.local_branch.to_string(),
            state,
        });
    }

    let shas = repo.commits_since(request.compare_from).await?;
    let Some(last_sha) = shas.last().cloned() else {
        return Err(Error::NoChangesDetected {
            branch: request.local_branch.to_string(),
            compare_from: request.compare_from.to_string(),
        });
    };

    let channel_branch = channel_branch_name(request.remote_base, request.local_branch);
    let remote_ref = format!("{}/{}", request.remote, request.remote_base);

    let outcome = async {
        let how = if repo.branch_sha(&channel_branch).await?.is_some() {
            repo.checkout(&channel_branch).await?;
            repo.reset_hard(&remote_ref).await?;
            BranchPreparation::Reset
        } else {
            repo.checkout_new_branch(&channel_branch, &remote_ref).await?;
            BranchPreparation::Created
        };
        transition(channel, &mut state, ChannelState::LocalBranchReady);
        progress
            .on_branch_ready(channel, &channel_branch, request.remote_base, how)
            .await;

        for sha in &shas {
            match repo.cherry_pick(sha).await? {
                CherryPickResult::Applied(summary) => {
                    progress.on_commit_picked(channel, sha, &summary).await;
                }
                CherryPickResult::Failed(details) => {
                    transition(channel, &mut state, ChannelState::Failed);
                    return Err(Error::CherryPickFailed {
                        branch: channel_branch.clone(),
                        sha: sha.clone(),
                        details,
                    });
                }
            }
        }

        transition(channel, &mut state, ChannelState::CherryPicked);
        Ok::<(), Error>(())
    }
    .await;

    let restored = match repo.force_checkout(request.local_branch).await {
        Ok(()) => repo.reset_hard(&last_sha).await,
        Err(e) => Err(e),
    };

    match (outcome, restored) {
        (Ok(()), Ok(())) => Ok(PropagatedBranch {
            channel,
            branch: channel_branch,
            state,
        }),
        (Ok(()), Err(restore_err)) => Err(restore_err),
        (Err(err), restored) => {
            if let Err(restore_err) = restored {
                warn!(
                    branch = request.local_branch,
                    "failed to restore feature branch: {restore_err}"
                );
            }
            Err(err)
        }
    }
}
