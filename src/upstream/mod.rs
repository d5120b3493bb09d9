//! Upstream repository access.
//!
//! `UpstreamSource` is the seam between the assembler and the repository it
//! pulls from. `GitHubClient` talks to the raw-content host and REST API;
//! `LocalMirror` reads a checkout on disk.

pub mod contract;
pub mod github;
pub mod mirror;
pub mod types;

pub use contract::UpstreamSource;
pub use github::GitHubClient;
pub use mirror::LocalMirror;
pub use types::{repo_path, ContentEntry, ContentKind, RawFetch, TreeEntry, TreeEntryKind, TreeListing};

use crate::config::AssemblerConfig;
use crate::error::BuildError;
use std::path::Path;

/// Pick the upstream for a configuration: the local mirror when one is set,
/// GitHub otherwise.
pub fn from_config(
    config: &AssemblerConfig,
    workspace_root: &Path,
) -> Result<Box<dyn UpstreamSource>, BuildError> {
    match config.paths.resolve_mirror(workspace_root) {
        Some(dir) => Ok(Box::new(LocalMirror::new(dir)?)),
        None => {
            let client = GitHubClient::from_env(&config.upstream)?;
            tracing::debug!(authenticated = client.has_token(), "Using GitHub upstream");
            Ok(Box::new(client))
        }
    }
}
