//! uplift - release channel uplifts for GitHub
//!
//! CLI binary that cherry-picks the current branch onto each release
//! channel and opens the pull requests.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use uplift::config::{DEFAULT_BASE_BRANCH, DEFAULT_REMOTE, DEFAULT_VERSION_FILE, UpliftOptions};
use uplift::logging::init_logging;

mod cli;

#[derive(Parser)]
#[command(name = "uplift")]
#[command(about = "Create PRs for every release channel from the current branch")]
#[command(version)]
struct Cli {
    /// Path to the git repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Comma separated list of GitHub logins to mark as reviewers
    #[arg(long, value_delimiter = ',')]
    reviewers: Vec<String>,

    /// Comma separated list of GitHub logins to mark as assignees
    #[arg(long, value_delimiter = ',')]
    owners: Vec<String>,

    /// Starting at nightly, how far back to uplift the changes
    /// [default: nightly, or release with --uplift-using-pr]
    #[arg(long)]
    uplift_to: Option<String>,

    /// Number of an existing pull request to uplift instead of the local branch
    #[arg(long)]
    uplift_using_pr: Option<String>,

    /// Start from dev/beta/release instead of nightly
    #[arg(long, default_value = "nightly")]
    start_from: String,

    /// Print GitHub API and git calls
    #[arg(short, long)]
    verbose: bool,

    /// Don't push or create pull requests; just show what would be done
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Comma separated list of labels to apply to each pull request
    #[arg(long, value_delimiter = ',')]
    labels: Vec<String>,

    /// Title to use instead of inferring one from the first commit
    #[arg(long)]
    title: Option<String>,

    /// Git remote to fetch from and push to
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Branch nightly pull requests target
    #[arg(long, default_value = DEFAULT_BASE_BRANCH)]
    base_branch: String,

    /// JSON file whose `version` field holds the nightly version
    #[arg(long, default_value = DEFAULT_VERSION_FILE)]
    version_file: String,

    /// Repository (owner/name) holding the version file
    #[arg(long)]
    version_repo: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let options = UpliftOptions {
        reviewers: cli.reviewers,
        owners: cli.owners,
        uplift_to: cli.uplift_to,
        uplift_using_pr: cli.uplift_using_pr,
        start_from: cli.start_from,
        dry_run: cli.dry_run,
        labels: cli.labels,
        title: cli.title,
        remote: cli.remote,
        base_branch: cli.base_branch,
        version_file: cli.version_file,
        version_repo: cli.version_repo,
    };

    cli::run_uplift_command(&path, &options).await?;

    Ok(())
}
