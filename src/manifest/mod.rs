//! Manifest Patcher
//!
//! Keeps the packaged manifest's version in step with upstream and exposes
//! locale directories under the spellings browsers expect.

pub mod aliases;
pub mod version;

pub use aliases::{apply_aliases, published_locales, AppliedAlias};
pub use version::{apply_version, patch_version, VersionPatch};
