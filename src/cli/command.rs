//! Uplift command - propagate the current branch and open the PRs

use crate::cli::progress::CliProgress;
use crate::cli::style::{Stream, Stylize, check, hyperlink_url};
use anstream::{eprintln, println};
use std::path::Path;
use uplift::config::{RunConfig, UpliftOptions};
use uplift::error::{Error, Result};
use uplift::platform::{create_platform_service, parse_repo_info};
use uplift::repo::GitRepo;
use uplift::submit::{UpliftResult, run_uplift};

/// Run the uplift command
pub async fn run_uplift_command(path: &Path, options: &UpliftOptions) -> Result<()> {
    // Configuration errors surface before anything touches git or GitHub
    options.validate()?;

    let repo = GitRepo::open(path).await?;

    let remotes = repo.remotes().await?;
    let remote = remotes
        .iter()
        .find(|r| r.name == options.remote)
        .ok_or_else(|| Error::RemoteNotFound(options.remote.clone()))?;
    let platform_config = parse_repo_info(&remote.url)?;

    let platform = create_platform_service(&platform_config).await?;
    let config = RunConfig::resolve(options, platform.as_ref()).await?;

    if config.dry_run {
        println!(
            "{}",
            "Dry run - nothing will be pushed or created on GitHub".warn().for_stdout()
        );
    }

    let progress = CliProgress::new();
    let result = run_uplift(&config, &repo, platform.as_ref(), &progress).await?;

    print_summary(&result, config.dry_run);

    if result.submission.success {
        Ok(())
    } else {
        Err(Error::SubmissionFailed(result.submission.errors.len()))
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn print_summary(result: &UpliftResult, dry_run: bool) {
    let submission = &result.submission;
    println!();

    if dry_run {
        let count = submission.planned_prs.len();
        println!(
            "Would create {} PR{}",
            count.to_string().accent(),
            plural(count)
        );
    } else if !submission.created_prs.is_empty() {
        let count = submission.created_prs.len();
        println!(
            "{} Created {} PR{}",
            check(),
            count.to_string().accent(),
            plural(count)
        );
        for (channel, pr) in &submission.created_prs {
            println!(
                "  {} #{} {}",
                channel.to_string().emphasis(),
                pr.number,
                hyperlink_url(Stream::Stdout, &pr.html_url)
            );
        }
    }

    for channel in &submission.skipped {
        println!(
            "  {} {}",
            channel.to_string().emphasis(),
            "skipped (no milestone)".muted()
        );
    }

    if !submission.success {
        eprintln!("{}", "Pull request submission failed".error());
        for err in &submission.errors {
            eprintln!("  {err}");
        }
    }
}
