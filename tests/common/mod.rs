//! Shared helpers for integration tests

pub mod fixtures;
pub mod git_fixture;
pub mod mock_platform;
