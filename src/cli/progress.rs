//! CLI progress callback with styled output and a resolve spinner

use crate::cli::style::{Stream, Stylize, arrow, check, cross, hyperlink_url, spinner_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;
use uplift::error::Error;
use uplift::submit::{BranchPreparation, Phase, ProgressCallback, PushStatus};
use uplift::types::{Channel, PullRequest};

const SHORT_SHA: usize = 10;

/// Progress callback that prints to the terminal
///
/// A spinner covers the resolve phase (fetch, version lookup); everything
/// after it is line output.
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress printer with no active spinner
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    /// Print a line without tearing an active spinner
    fn line(&self, text: &str) {
        if let Ok(slot) = self.spinner.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.println(text);
                return;
            }
        }
        println!("{text}");
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn short(sha: &str) -> &str {
    sha.get(..SHORT_SHA).unwrap_or(sha)
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.finish_spinner();
        match phase {
            Phase::Resolving => self.start_spinner(format!("{phase}...")),
            Phase::Complete => println!("\n{} {}", check(), phase.to_string().success()),
            _ => println!("\n{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_branch_ready(
        &self,
        channel: Channel,
        branch: &str,
        base: &str,
        how: BranchPreparation,
    ) {
        let tag = format!("({channel})");
        match how {
            BranchPreparation::FeatureBranch => println!(
                "{} using \"{}\" as-is (targets {})",
                tag.emphasis(),
                branch.accent(),
                base.muted()
            ),
            BranchPreparation::Reset => println!(
                "{} branch \"{}\" exists; resetting to {}",
                tag.emphasis(),
                branch.accent(),
                base.accent()
            ),
            BranchPreparation::Created => println!(
                "{} creating \"{}\" from {}",
                tag.emphasis(),
                branch.accent(),
                base.accent()
            ),
        }
    }

    async fn on_commit_picked(&self, _channel: Channel, sha: &str, summary: &str) {
        println!("  {} picked {} {}", arrow(), short(sha).muted(), summary);
    }

    async fn on_push(&self, branches: &[String], status: PushStatus) {
        let list = branches.join(", ");
        match &status {
            PushStatus::Started => println!("  Pushing {}...", list.accent()),
            PushStatus::Success => println!("  {} Pushed {}", check(), list.emphasis()),
            PushStatus::Skipped => println!(
                "  {} {}",
                list.accent(),
                status.to_string().muted()
            ),
            PushStatus::Failed(_) => eprintln!(
                "  {} Failed to push {}: {}",
                cross(),
                list.accent().for_stderr(),
                status.to_string().error()
            ),
        }
    }

    async fn on_pr_created(&self, channel: Channel, pr: &PullRequest) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} Created PR {} for {}",
            check(),
            pr_num.accent(),
            channel.to_string().emphasis()
        );
        println!("    {}", hyperlink_url(Stream::Stdout, &pr.html_url));
    }

    async fn on_pr_skipped(&self, channel: Channel, reason: &str) {
        println!(
            "  {} {}",
            format!("({channel})").emphasis(),
            reason.warn().for_stdout()
        );
    }

    async fn on_error(&self, err: &Error) {
        self.finish_spinner();
        eprintln!("{}: {}", "error".error(), err);
    }

    async fn on_message(&self, message: &str) {
        self.line(message);
    }
}
