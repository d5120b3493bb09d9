//! Tooling Layer
//!
//! Command-line entry points and their text renderers.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, UpstreamArgs};
