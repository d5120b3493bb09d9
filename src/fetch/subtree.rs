//! Recursive addon download.
//!
//! Directories are created before any file is written, in an explicit
//! depth-descending pass. Creating the deepest directory first also creates
//! its parents, and the order never depends on how the API sorted its reply.

use crate::config::{is_contained_path, PackageConfig};
use crate::error::BuildError;
use crate::staging::StagingLayout;
use crate::upstream::{ContentEntry, ContentKind, TreeEntryKind, TreeListing, UpstreamSource};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::path::Path;

/// Number of `/` separators in a tree path.
pub fn path_depth(path: &str) -> usize {
    path.matches('/').count()
}

/// Ordered work for one subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubtreePlan {
    /// Creation order: deepest first, ties by path
    pub directories: Vec<String>,
    pub files: Vec<String>,
    /// Submodule pointers and unknown entry kinds
    pub skipped: Vec<String>,
}

impl SubtreePlan {
    pub fn from_listing(listing: &TreeListing) -> Result<Self, BuildError> {
        let mut plan = SubtreePlan::default();
        for entry in &listing.entries {
            if entry.path.starts_with('/') || !is_contained_path(&entry.path) {
                return Err(BuildError::Upstream(format!(
                    "Refusing tree entry outside the subtree: {}",
                    entry.path
                )));
            }
            match entry.kind {
                TreeEntryKind::Tree => plan.directories.push(entry.path.clone()),
                TreeEntryKind::Blob => plan.files.push(entry.path.clone()),
                TreeEntryKind::Commit | TreeEntryKind::Other => {
                    tracing::warn!(path = %entry.path, kind = ?entry.kind, "Skipping non-file tree entry");
                    plan.skipped.push(entry.path.clone());
                }
            }
        }
        plan.directories
            .sort_by(|a, b| path_depth(b).cmp(&path_depth(a)).then_with(|| a.cmp(b)));
        plan.directories.dedup();
        plan.files.sort();
        Ok(plan)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubtreeReport {
    pub addon: String,
    pub directories: usize,
    pub files: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Find `name` among the directories listed under `parent`.
pub async fn locate_subtree(
    source: &dyn UpstreamSource,
    parent: &str,
    name: &str,
) -> Result<ContentEntry, BuildError> {
    source
        .list_directory(parent)
        .await?
        .into_iter()
        .find(|entry| entry.name == name && entry.kind == ContentKind::Dir)
        .ok_or_else(|| {
            BuildError::Upstream(format!(
                "No directory named '{}' under '{}' in {}",
                name,
                parent,
                source.label()
            ))
        })
}

/// Resolve the addon subtree and plan its download.
pub async fn plan_subtree(
    source: &dyn UpstreamSource,
    package: &PackageConfig,
) -> Result<SubtreePlan, BuildError> {
    let entry = locate_subtree(source, &package.addons_dir, &package.addon).await?;
    let listing = source.fetch_tree(&entry.sha).await?;
    if listing.truncated {
        return Err(BuildError::Upstream(format!(
            "Tree listing for {} was truncated by the API",
            entry.path
        )));
    }
    SubtreePlan::from_listing(&listing)
}

/// Download the addon subtree into `<staging>/<addon_dest>`.
pub async fn fetch_subtree(
    source: &dyn UpstreamSource,
    package: &PackageConfig,
    layout: &StagingLayout,
    concurrency: usize,
) -> Result<SubtreeReport, BuildError> {
    let plan = plan_subtree(source, package).await?;
    let dest_root = layout.path(&package.addon_dest);

    create_directories(&dest_root, &plan.directories).await?;
    tracing::info!(
        addon = %package.addon,
        directories = plan.directories.len(),
        "Created directories for DevTools addon"
    );

    let prefix = format!(
        "{}/{}",
        package.addons_dir.trim_matches('/'),
        package.addon.trim_matches('/')
    );
    let sizes: Vec<u64> = stream::iter(plan.files.iter().map(|file| {
        let upstream_path = format!("{}/{}", prefix, file);
        let dest = dest_root.join(file);
        async move { source.download(&upstream_path, &dest).await }
    }))
    .buffer_unordered(concurrency.max(1))
    .try_collect()
    .await?;

    let report = SubtreeReport {
        addon: package.addon.clone(),
        directories: plan.directories.len(),
        files: sizes.len(),
        skipped: plan.skipped.len(),
        bytes: sizes.iter().sum(),
    };
    tracing::info!(
        addon = %report.addon,
        files = report.files,
        bytes = report.bytes,
        "Downloaded files for DevTools addon"
    );
    Ok(report)
}

/// Sequentially create `directories` under `root`, in the given order.
async fn create_directories(root: &Path, directories: &[String]) -> Result<(), BuildError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| BuildError::io(root, e))?;
    for dir in directories {
        let path = root.join(dir);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(())
}
