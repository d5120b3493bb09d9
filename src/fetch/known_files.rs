//! Fixed source-to-destination downloads.

use crate::config::KnownFile;
use crate::error::BuildError;
use crate::staging::{ensure_parent, StagingLayout};
use crate::upstream::UpstreamSource;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct KnownFilesReport {
    pub files: usize,
    pub bytes: u64,
}

/// Download every known file into staging, at most `concurrency` at a time.
///
/// Completion order is unspecified; the first failure aborts the batch.
pub async fn fetch_known_files(
    source: &dyn UpstreamSource,
    files: &[KnownFile],
    layout: &StagingLayout,
    concurrency: usize,
) -> Result<KnownFilesReport, BuildError> {
    let sizes: Vec<u64> = stream::iter(files.iter().map(|file| async move {
        let dest = layout.path(&file.destination);
        ensure_parent(&dest).await?;
        let bytes = source.download(&file.source, &dest).await?;
        tracing::debug!(source = %file.source, destination = %file.destination, bytes, "Fetched known file");
        Ok::<u64, BuildError>(bytes)
    }))
    .buffer_unordered(concurrency.max(1))
    .try_collect()
    .await?;

    let report = KnownFilesReport {
        files: sizes.len(),
        bytes: sizes.iter().sum(),
    };
    tracing::info!(
        files = report.files,
        bytes = report.bytes,
        upstream = %source.label(),
        "Downloaded ScratchAddons files"
    );
    Ok(report)
}
