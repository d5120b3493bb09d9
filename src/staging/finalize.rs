//! Final touch: the override tree ships the package README under a different
//! name so it does not clash with the repository's own README.

use super::StagingLayout;
use crate::config::ReadmeConfig;
use crate::error::BuildError;
use std::fs;

/// Move the replacement README over the target. Returns whether a swap happened.
pub fn replace_readme(layout: &StagingLayout, readme: &ReadmeConfig) -> Result<bool, BuildError> {
    let Some(replacement) = readme.replacement.as_deref() else {
        return Ok(false);
    };

    let source = layout.path(replacement);
    if !source.is_file() {
        tracing::debug!(replacement, "No replacement README in staging");
        return Ok(false);
    }

    let target = layout.path(&readme.target);
    if target.exists() {
        fs::remove_file(&target).map_err(|e| BuildError::io(&target, e))?;
    }
    fs::rename(&source, &target).map_err(|e| BuildError::io(&source, e))?;
    tracing::info!(target = %readme.target, "Replaced README");
    Ok(true)
}
