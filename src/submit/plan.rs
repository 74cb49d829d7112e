//! Pull request planning
//!
//! Decides the base, title and body of each channel's PR. Pure, so the
//! rules can be tested without GitHub.

use crate::types::Channel;

/// Body of an originating (non-uplift) pull request
pub const PLACEHOLDER_BODY: &str = "Description to be filled in.\n(created using `uplift`)";

/// Inputs for planning one channel's PR
#[derive(Debug, Clone)]
pub struct PlanInputs<'a> {
    /// Channel the PR is for
    pub channel: Channel,
    /// Remote branch of the channel
    pub remote_base: &'a str,
    /// Local branch holding the channel's commits (the PR head)
    pub head: &'a str,
    /// Feature branch the run started from
    pub feature_branch: &'a str,
    /// Revision the feature branch was diffed against
    pub top_level_base: &'a str,
    /// Branch nightly PRs target
    pub base_branch: &'a str,
    /// Run title
    pub title: &'a str,
    /// Originating PR, once known
    pub origin_pr: Option<u64>,
}

/// A PR that should be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrToCreate {
    /// Channel the PR is for
    pub channel: Channel,
    /// Remote branch of the channel (used for milestone lookup)
    pub remote_base: String,
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Whether this is the originating PR rather than an uplift
    pub is_origin: bool,
}

/// Plan one channel's PR
pub fn plan_pull_request(inputs: &PlanInputs<'_>) -> PrToCreate {
    let is_origin = inputs.channel.is_nightly() || inputs.head.starts_with(inputs.top_level_base);

    let base = if inputs.channel.is_nightly() {
        inputs.base_branch
    } else {
        inputs.remote_base
    };

    let (title, body) = if is_origin {
        (inputs.title.to_string(), PLACEHOLDER_BODY.to_string())
    } else {
        let body = inputs.origin_pr.map_or_else(
            || format!("Uplift of `{}`", inputs.feature_branch),
            |number| format!("Uplift of #{number}"),
        );
        (
            format!("{} (uplift to {})", inputs.title, inputs.remote_base),
            body,
        )
    };

    PrToCreate {
        channel: inputs.channel,
        remote_base: inputs.remote_base.to_string(),
        head: inputs.head.to_string(),
        base: base.to_string(),
        title,
        body,
        is_origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(channel: Channel, remote_base: &'a str, head: &'a str) -> PlanInputs<'a> {
        PlanInputs {
            channel,
            remote_base,
            head,
            feature_branch: "fix-crash",
            top_level_base: "master",
            base_branch: "master",
            title: "Fix crash on startup",
            origin_pr: Some(1234),
        }
    }

    #[test]
    fn test_nightly_targets_base_branch() {
        let pr = plan_pull_request(&inputs(Channel::Nightly, "0.60.x", "fix-crash"));
        assert!(pr.is_origin);
        assert_eq!(pr.base, "master");
        assert_eq!(pr.head, "fix-crash");
        assert_eq!(pr.title, "Fix crash on startup");
        assert_eq!(pr.body, PLACEHOLDER_BODY);
    }

    #[test]
    fn test_uplift_title_and_body() {
        let pr = plan_pull_request(&inputs(Channel::Beta, "0.58.x", "0.58.x_fix-crash"));
        insta::assert_snapshot!(
            format!("{} -> {}\n{}\n{}", pr.head, pr.base, pr.title, pr.body),
            @r"
        0.58.x_fix-crash -> 0.58.x
        Fix crash on startup (uplift to 0.58.x)
        Uplift of #1234
        "
        );
        assert!(!pr.is_origin);
    }

    #[test]
    fn test_uplift_without_origin_number() {
        let mut input = inputs(Channel::Dev, "0.59.x", "0.59.x_fix-crash");
        input.origin_pr = None;
        let pr = plan_pull_request(&input);
        assert_eq!(pr.body, "Uplift of `fix-crash`");
    }

    #[test]
    fn test_start_from_channel_is_origin() {
        let mut input = inputs(Channel::Dev, "0.59.x", "0.59.x_fix-crash");
        input.top_level_base = "0.59.x";
        input.origin_pr = None;
        let pr = plan_pull_request(&input);

        assert!(pr.is_origin);
        assert_eq!(pr.base, "0.59.x");
        assert_eq!(pr.title, "Fix crash on startup");
        assert_eq!(pr.body, PLACEHOLDER_BODY);
    }
}
