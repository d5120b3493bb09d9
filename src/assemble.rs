//! Package assembly pipeline.
//!
//! Phases run strictly in order; each one completes (or aborts the run)
//! before the next starts. Concurrency only exists inside a phase.

use crate::config::AssemblerConfig;
use crate::error::BuildError;
use crate::fetch::{fetch_known_files, fetch_subtree, KnownFilesReport, SubtreeReport};
use crate::l10n::{localize, LocaleReport};
use crate::manifest::{apply_aliases, patch_version, published_locales, AppliedAlias, VersionPatch};
use crate::staging::{self, PrepareReport, StagingLayout};
use crate::upstream::UpstreamSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub upstream: String,
    pub staging_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub prepare: PrepareReport,
    pub known_files: KnownFilesReport,
    pub subtree: SubtreeReport,
    pub locales: LocaleReport,
    pub manifest: VersionPatch,
    pub aliases: Vec<AppliedAlias>,
    /// `_locales` directories after aliasing
    pub published_locales: Vec<String>,
    pub readme_replaced: bool,
}

pub struct Assembler {
    source: Box<dyn UpstreamSource>,
    config: AssemblerConfig,
    source_dir: PathBuf,
    mirror_dir: Option<PathBuf>,
    layout: StagingLayout,
}

impl Assembler {
    pub fn new(
        source: Box<dyn UpstreamSource>,
        config: AssemblerConfig,
        workspace_root: &Path,
    ) -> Self {
        let (source_dir, staging_dir) = config.paths.resolve_paths(workspace_root);
        let mirror_dir = config.paths.resolve_mirror(workspace_root);
        Self {
            source,
            config,
            source_dir,
            mirror_dir,
            layout: StagingLayout::new(staging_dir),
        }
    }

    pub fn layout(&self) -> &StagingLayout {
        &self.layout
    }

    /// Assemble the package into the staging directory.
    ///
    /// A failed run leaves staging as far as it got.
    pub async fn run(&self) -> Result<AssemblyReport, BuildError> {
        let started_at = Utc::now();
        let source = self.source.as_ref();
        let concurrency = self.config.upstream.max_concurrent_requests;
        let package = &self.config.package;
        let locales = &self.config.locales;

        tracing::info!(
            upstream = %source.label(),
            staging = %self.layout.root().display(),
            "Assembling DevTools package"
        );

        let protected: Vec<PathBuf> = self.mirror_dir.iter().cloned().collect();
        let prepare = staging::prepare(
            &self.source_dir,
            &self.layout,
            &package.staging_dirs,
            &protected,
        )?;
        let known_files =
            fetch_known_files(source, &package.known_files, &self.layout, concurrency).await?;
        let subtree = fetch_subtree(source, package, &self.layout, concurrency).await?;
        let locale_report = localize(source, locales, &self.layout, concurrency).await?;
        let manifest = patch_version(source, &self.layout, &package.manifest).await?;
        let messages_root = self.layout.path(&locales.messages_dest);
        let aliases = apply_aliases(&messages_root, &locales.aliases)?;
        let published = published_locales(&messages_root)?;
        let readme_replaced = staging::replace_readme(&self.layout, &self.config.readme)?;

        let finished_at = Utc::now();
        tracing::info!(
            version = %manifest.version,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "DevTools package assembled"
        );

        Ok(AssemblyReport {
            upstream: source.label(),
            staging_dir: self.layout.root().to_path_buf(),
            started_at,
            finished_at,
            prepare,
            known_files,
            subtree,
            locales: locale_report,
            manifest,
            aliases,
            published_locales: published,
            readme_replaced,
        })
    }
}
