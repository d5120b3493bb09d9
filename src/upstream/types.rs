//! Upstream repository entries, shaped after the GitHub REST API.

use serde::{Deserialize, Serialize};

/// Kind of an entry in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Tree identifier passed to `fetch_tree` for directories
    pub sha: String,
}

/// Kind of an entry in a recursive tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    /// Submodule pointer
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of a recursive tree, path relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    #[serde(default)]
    pub sha: String,
}

impl TreeEntry {
    pub fn new(path: &str, kind: TreeEntryKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            sha: String::new(),
        }
    }
}

/// Recursive tree listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeListing {
    #[serde(rename = "tree")]
    pub entries: Vec<TreeEntry>,
    /// Set by the API when the listing exceeded its size limit
    #[serde(default)]
    pub truncated: bool,
}

/// Result of a raw-content fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFetch {
    Found(Vec<u8>),
    /// Non-success status; the body is discarded
    Unavailable { status: u16 },
}

/// Normalize a repository path: no leading slash.
pub fn repo_path(path: &str) -> &str {
    path.trim_start_matches('/')
}
