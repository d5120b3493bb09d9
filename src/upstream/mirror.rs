//! Local mirror upstream: a checkout of the upstream repository on disk.
//!
//! Tree identifiers are repository-relative paths, so `list_directory`
//! returns each directory's own path as its `sha`.

use crate::error::BuildError;
use crate::upstream::contract::UpstreamSource;
use crate::upstream::types::{
    repo_path, ContentEntry, ContentKind, RawFetch, TreeEntry, TreeEntryKind, TreeListing,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct LocalMirror {
    root: PathBuf,
}

impl LocalMirror {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BuildError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(BuildError::ConfigError(format!(
                "Mirror directory not found: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(repo_path(path))
    }
}

/// Join path components with `/` regardless of platform.
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl UpstreamSource for LocalMirror {
    fn label(&self) -> String {
        format!("mirror:{}", self.root.display())
    }

    async fn fetch_raw(&self, path: &str) -> Result<RawFetch, BuildError> {
        let file = self.resolve(path);
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(RawFetch::Found(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RawFetch::Unavailable { status: 404 }),
            Err(e) => Err(BuildError::io(file, e)),
        }
    }

    async fn download(&self, path: &str, dest: &Path) -> Result<u64, BuildError> {
        let file = self.resolve(path);
        match tokio::fs::copy(&file, dest).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound && !file.exists() => Err(
                BuildError::Upstream(format!("{} not found in {}", path, self.label())),
            ),
            Err(e) => Err(BuildError::io(dest, e)),
        }
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<ContentEntry>, BuildError> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            return Err(BuildError::Upstream(format!(
                "{} is not a directory in {}",
                path,
                self.label()
            )));
        }

        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| BuildError::io(&dir, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| BuildError::io(&dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| BuildError::io(entry.path(), e))?;
            let kind = if file_type.is_dir() {
                ContentKind::Dir
            } else if file_type.is_symlink() {
                ContentKind::Symlink
            } else {
                ContentKind::File
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = match repo_path(path) {
                "" => name.clone(),
                parent => format!("{}/{}", parent.trim_end_matches('/'), name),
            };
            entries.push(ContentEntry {
                name,
                sha: entry_path.clone(),
                path: entry_path,
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch_tree(&self, sha: &str) -> Result<TreeListing, BuildError> {
        let base = self.resolve(sha);
        if !base.is_dir() {
            return Err(BuildError::Upstream(format!(
                "Tree {} not found in {}",
                sha,
                self.label()
            )));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&base).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone());
                BuildError::io(path, e.into())
            })?;
            let relative = entry
                .path()
                .strip_prefix(&base)
                .map_err(|e| BuildError::Upstream(format!("Mirror walk escaped tree: {}", e)))?;
            let kind = if entry.file_type().is_dir() {
                TreeEntryKind::Tree
            } else {
                TreeEntryKind::Blob
            };
            let path = slash_path(relative);
            entries.push(TreeEntry {
                sha: format!("{}/{}", repo_path(sha).trim_end_matches('/'), path),
                path,
                kind,
            });
        }

        Ok(TreeListing {
            entries,
            truncated: false,
        })
    }
}
