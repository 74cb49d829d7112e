//! Platform service factory

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use tracing::debug;

/// Create the GitHub service for a repository
///
/// Resolves the token and builds the client.
pub async fn create_platform_service(config: &PlatformConfig) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth().await?;
    debug!(source = ?auth.source, "resolved GitHub token");
    Ok(Box::new(GitHubService::new(&auth.token, config.clone())?))
}
