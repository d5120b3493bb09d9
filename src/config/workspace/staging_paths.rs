//! PathsConfig and resolve_paths for the override and staging trees.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("tmp")
}

/// Local directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// DevTools-specific override tree copied into staging first
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Staging root, wiped on every run
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Local checkout used instead of the network when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_dir: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve source and staging directories against the workspace root.
    ///
    /// Absolute paths are kept as-is.
    pub fn resolve_paths(&self, workspace_root: &Path) -> (PathBuf, PathBuf) {
        (
            workspace_root.join(&self.source_dir),
            workspace_root.join(&self.staging_dir),
        )
    }

    /// Resolve the mirror directory, if any, against the workspace root.
    pub fn resolve_mirror(&self, workspace_root: &Path) -> Option<PathBuf> {
        self.mirror_dir.as_ref().map(|dir| workspace_root.join(dir))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            staging_dir: default_staging_dir(),
            mirror_dir: None,
        }
    }
}
