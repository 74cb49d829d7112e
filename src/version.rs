//! Channel branch names from version strings
//!
//! A version `0.60.2` lives on branch `0.60.x`; each older channel sits one
//! minor version further back.

use crate::error::{Error, Result};
use crate::types::ChannelBranchMap;

const WILDCARD: &str = "x";

/// Split `[v]major.minor.patch` into its numeric major/minor parts
fn major_minor(version: &str) -> Result<(&str, u64)> {
    let trimmed = version.strip_prefix('v').unwrap_or(version);
    let mut parts = trimmed.splitn(3, '.');

    let (Some(major), Some(minor), Some(patch)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::MalformedVersion(version.to_string()));
    };

    if patch.is_empty() || major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedVersion(version.to_string()));
    }

    let minor = minor
        .parse::<u64>()
        .map_err(|_| Error::MalformedVersion(version.to_string()))?;

    Ok((major, minor))
}

/// Branch for a version: `0.60.2` → `0.60.x`
pub fn current_version_branch(version: &str) -> Result<String> {
    let (major, minor) = major_minor(version)?;
    Ok(format!("{major}.{minor}.{WILDCARD}"))
}

/// Branch one minor version back: `0.60.x` → `0.59.x`
pub fn previous_version_branch(branch: &str) -> Result<String> {
    let (major, minor) = major_minor(branch)?;
    let previous = minor
        .checked_sub(1)
        .ok_or_else(|| Error::NoPreviousVersion(branch.to_string()))?;
    Ok(format!("{major}.{previous}.{WILDCARD}"))
}

/// Remote branch of every channel, given the nightly version
pub fn remote_channel_branches(nightly_version: &str) -> Result<ChannelBranchMap> {
    let nightly = current_version_branch(nightly_version)?;
    let dev = previous_version_branch(&nightly)?;
    let beta = previous_version_branch(&dev)?;
    let release = previous_version_branch(&beta)?;
    Ok(ChannelBranchMap::new([nightly, dev, beta, release]))
}
