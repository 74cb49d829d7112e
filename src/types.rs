//! Core types for uplift

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A release channel, ordered from least to most stable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Tracks the top-level base branch
    Nightly,
    /// One minor version behind nightly
    Dev,
    /// Two minor versions behind nightly
    Beta,
    /// Three minor versions behind nightly
    Release,
}

impl Channel {
    /// All channels in processing order
    pub const ALL: [Self; 4] = [Self::Nightly, Self::Dev, Self::Beta, Self::Release];

    /// Position in [`Channel::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Nightly => 0,
            Self::Dev => 1,
            Self::Beta => 2,
            Self::Release => 3,
        }
    }

    /// Lowercase channel name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nightly => "nightly",
            Self::Dev => "dev",
            Self::Beta => "beta",
            Self::Release => "release",
        }
    }

    /// Whether this is the first (nightly) channel
    pub const fn is_nightly(self) -> bool {
        matches!(self, Self::Nightly)
    }

    /// Channels from `self` to the end of the order, inclusive
    pub fn from_here(self) -> &'static [Self] {
        &Self::ALL[self.index()..]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidChannel(s.to_string()))
    }
}

/// Validate a channel name against the fixed channel set
pub fn validate_channel(name: &str) -> Result<Channel> {
    name.parse()
}

/// Remote branch name for every channel, built once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelBranchMap {
    branches: [String; 4],
}

impl ChannelBranchMap {
    /// Build from branch names in channel order (nightly first)
    pub const fn new(branches: [String; 4]) -> Self {
        Self { branches }
    }

    /// Remote branch for a channel
    pub fn get(&self, channel: Channel) -> &str {
        &self.branches[channel.index()]
    }

    /// Channel whose remote branch is `branch`
    pub fn channel_for_branch(&self, branch: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| self.get(*c) == branch)
    }

    /// `(channel, branch)` pairs in channel order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &str)> {
        Channel::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Local branch created for each processed channel
///
/// Only grows during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationState {
    local_branches: BTreeMap<Channel, String>,
}

impl PropagationState {
    /// Record the local branch for a channel
    pub fn record(&mut self, channel: Channel, branch: String) {
        self.local_branches.entry(channel).or_insert(branch);
    }

    /// Local branch for a channel, if processed
    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.local_branches.get(&channel).map(String::as_str)
    }

    /// Number of processed channels
    pub fn len(&self) -> usize {
        self.local_branches.len()
    }

    /// Whether no channel has been processed
    pub fn is_empty(&self) -> bool {
        self.local_branches.is_empty()
    }

    /// `(channel, branch)` pairs in channel order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &str)> {
        self.local_branches.iter().map(|(c, b)| (*c, b.as_str()))
    }
}

/// A created pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Details of an existing pull request, used for `--uplift-using-pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head branch name
    pub head_ref: String,
    /// Head commit
    pub head_sha: String,
    /// Base branch name
    pub base_ref: String,
    /// Base commit the PR was opened against
    pub base_sha: String,
    /// Merge time, if merged
    pub merged_at: Option<DateTime<Utc>>,
}

/// A repository milestone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestone {
    /// Milestone number (used when assigning)
    pub number: u64,
    /// Milestone title, e.g. `0.59.x - Dev`
    pub title: String,
}

/// `owner/name` pair identifying a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// User or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::Parse(format!("expected owner/name, got \"{s}\""))),
        }
    }
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Target repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// The repository as an `owner/name` slug
    pub fn slug(&self) -> RepoSlug {
        RepoSlug {
            owner: self.owner.clone(),
            name: self.repo.clone(),
        }
    }
}
