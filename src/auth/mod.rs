//! GitHub authentication
//!
//! Tokens come from the environment, the npm config store, or the gh CLI.

mod github;

pub use github::{GitHubAuthConfig, NPM_TOKEN_KEY, get_github_auth, pick_token};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// `GITHUB_TOKEN` or `GH_TOKEN`
    EnvVar,
    /// `npm config get BRAVE_GITHUB_TOKEN`
    NpmConfig,
    /// `gh auth token`
    Cli,
}
