//! Upstream Fetcher
//!
//! Two kinds of downloads land in staging: a fixed list of known files, and
//! one addon subtree discovered through the repository tree API.

pub mod known_files;
pub mod subtree;

pub use known_files::{fetch_known_files, KnownFilesReport};
pub use subtree::{fetch_subtree, path_depth, plan_subtree, SubtreePlan, SubtreeReport};
