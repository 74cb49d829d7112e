//! Repository detection from remote URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::env;
use std::sync::OnceLock;

/// Whether a remote URL points at GitHub or the `GH_HOST` enterprise host
pub fn is_github_url(url: &str) -> bool {
    let gh_host = env::var("GH_HOST").ok();
    extract_hostname(url).is_some_and(|hostname| is_github_host(&hostname, gh_host.as_deref()))
}

fn is_github_host(hostname: &str, gh_host: Option<&str>) -> bool {
    hostname == "github.com"
        || hostname.ends_with(".github.com")
        || gh_host.is_some_and(|h| hostname == h)
}

fn remote_path_regexes() -> &'static [Regex; 2] {
    static RES: OnceLock<[Regex; 2]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // SSH: git@host:owner/repo.git
            Regex::new(r"^(?:ssh://)?git@[^:/]+[:/](.+?)(?:\.git)?/?$")
                .expect("hardcoded ssh pattern is valid"),
            // HTTPS: https://host/owner/repo.git
            Regex::new(r"^https?://[^/]+/(.+?)(?:\.git)?/?$")
                .expect("hardcoded https pattern is valid"),
        ]
    })
}

/// Parse repository info (owner/repo) from a GitHub remote URL
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    if !is_github_url(url) {
        return Err(Error::NoSupportedRemotes);
    }
    let hostname = extract_hostname(url);

    let path = remote_path_regexes()
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    let Some((owner, repo)) = path.split_once('/') else {
        return Err(Error::Parse(format!("invalid repo path: {path}")));
    };
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(Error::Parse(format!("invalid repo path: {path}")));
    }

    // Only enterprise hosts need a custom API base
    let host = hostname.filter(|h| h != "github.com");

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}

fn extract_hostname(url: &str) -> Option<String> {
    // SSH format
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split(':').next().map(ToString::to_string);
    }

    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
}
