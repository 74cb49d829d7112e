//! uplift - release channel uplifts for GitHub
//!
//! Cherry-picks the commits of a feature branch onto each release channel
//! branch (nightly → dev → beta → release) and opens one pull request per
//! channel with reviewers, owners, labels and milestone attached.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod repo;
pub mod submit;
pub mod types;
pub mod version;
