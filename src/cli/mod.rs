//! CLI command
//!
//! Wiring and terminal rendering for the `uplift` binary.

mod command;
mod progress;
mod style;

pub use command::run_uplift_command;
