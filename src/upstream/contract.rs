use crate::error::BuildError;
use crate::upstream::types::{ContentEntry, RawFetch, TreeListing};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Human-readable label for logs and reports.
    fn label(&self) -> String;

    /// Fetch a file's bytes; a non-success status is returned, not raised.
    async fn fetch_raw(&self, path: &str) -> Result<RawFetch, BuildError>;

    /// Stream a file to `dest`, returning the byte count. Any non-success is an error.
    async fn download(&self, path: &str, dest: &Path) -> Result<u64, BuildError>;

    /// List the immediate children of a repository directory.
    async fn list_directory(&self, path: &str) -> Result<Vec<ContentEntry>, BuildError>;

    /// Recursively list the tree identified by `sha`.
    async fn fetch_tree(&self, sha: &str) -> Result<TreeListing, BuildError>;

    /// Fetch and parse a JSON document that must exist.
    async fn fetch_json_required(&self, path: &str) -> Result<Value, BuildError> {
        match self.fetch_raw(path).await? {
            RawFetch::Found(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| BuildError::json(path, e))
            }
            RawFetch::Unavailable { status } => Err(BuildError::Upstream(format!(
                "{} is unavailable from {} (HTTP {})",
                path,
                self.label(),
                status
            ))),
        }
    }
}
