//! Staging directory lifecycle.
//!
//! The staging root is ephemeral: `prepare` wipes it, copies the local
//! override tree in, and creates the directories later phases write into.
//! `finalize` runs last and swaps in the distribution README.

pub mod finalize;
pub mod prepare;

pub use finalize::replace_readme;
pub use prepare::{prepare, PrepareReport};

use crate::upstream::repo_path;
use std::path::{Path, PathBuf};

/// Resolved locations inside the staging root.
#[derive(Debug, Clone)]
pub struct StagingLayout {
    root: PathBuf,
}

impl StagingLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a staging-relative path; leading slashes are ignored.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(repo_path(relative))
    }
}

/// Create `path`'s parent directory if needed.
pub(crate) async fn ensure_parent(path: &Path) -> Result<(), crate::error::BuildError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| crate::error::BuildError::io(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_ignore_leading_slash() {
        let layout = StagingLayout::new("/stage");
        assert_eq!(layout.path("/inject/l10n.js"), PathBuf::from("/stage/inject/l10n.js"));
        assert_eq!(layout.path("_locales"), PathBuf::from("/stage/_locales"));
        assert_eq!(layout.root(), Path::new("/stage"));
    }
}
