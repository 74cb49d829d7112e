//! GitHub token resolution

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Key looked up in the npm config store
pub const NPM_TOKEN_KEY: &str = "BRAVE_GITHUB_TOKEN";

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. npm config store (`npm config get BRAVE_GITHUB_TOKEN`)
/// 4. gh CLI (`gh auth token`)
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    let env_token = env::var("GITHUB_TOKEN")
        .ok()
        .or_else(|| env::var("GH_TOKEN").ok());

    if let Some(auth) = pick_token(env_token, None, None) {
        return Ok(auth);
    }

    let npm_token = get_npm_config_token().await;
    let cli_token = if npm_token.is_none() {
        get_gh_cli_token().await
    } else {
        None
    };

    pick_token(None, npm_token, cli_token).ok_or_else(|| {
        Error::Auth(format!(
            "no valid GitHub token was found; set GITHUB_TOKEN, add {NPM_TOKEN_KEY} to your npm config, or run `gh auth login`"
        ))
    })
}

/// Choose the first usable token in priority order
///
/// Blank values are treated as missing.
pub fn pick_token(
    env_token: Option<String>,
    npm_token: Option<String>,
    cli_token: Option<String>,
) -> Option<GitHubAuthConfig> {
    [
        (env_token, AuthSource::EnvVar),
        (npm_token, AuthSource::NpmConfig),
        (cli_token, AuthSource::Cli),
    ]
    .into_iter()
    .find_map(|(token, source)| {
        let token = token?.trim().to_string();
        (!token.is_empty()).then_some(GitHubAuthConfig { token, source })
    })
}

async fn get_npm_config_token() -> Option<String> {
    let output = Command::new("npm")
        .args(["config", "get", NPM_TOKEN_KEY])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!("npm config lookup failed");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() || token == "undefined" || token == "null" {
        None
    } else {
        Some(token)
    }
}

async fn get_gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
