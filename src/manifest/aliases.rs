//! Regional-variant aliasing for `_locales`.

use crate::config::{AliasMode, LocaleAlias};
use crate::error::BuildError;
use crate::staging::prepare::copy_dir;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAlias {
    pub from: String,
    pub to: String,
    pub mode: AliasMode,
}

/// Apply alias rules in order under `locales_root`.
///
/// A rule whose source locale is absent is skipped; an existing destination
/// is replaced.
pub fn apply_aliases(
    locales_root: &Path,
    aliases: &[LocaleAlias],
) -> Result<Vec<AppliedAlias>, BuildError> {
    let mut applied = Vec::new();
    for alias in aliases {
        if alias.from == alias.to {
            tracing::warn!(locale = %alias.from, "Alias maps a locale onto itself, skipping");
            continue;
        }
        let from = locales_root.join(&alias.from);
        let to = locales_root.join(&alias.to);
        if !from.is_dir() {
            tracing::warn!(from = %alias.from, to = %alias.to, "Alias source locale missing, skipping");
            continue;
        }
        if to.exists() {
            fs::remove_dir_all(&to).map_err(|e| BuildError::io(&to, e))?;
        }
        match alias.mode {
            AliasMode::Move => fs::rename(&from, &to).map_err(|e| BuildError::io(&from, e))?,
            AliasMode::Copy => {
                copy_dir(&from, &to)?;
            }
        }
        tracing::debug!(from = %alias.from, to = %alias.to, mode = ?alias.mode, "Aliased locale");
        applied.push(AppliedAlias {
            from: alias.from.clone(),
            to: alias.to.clone(),
            mode: alias.mode,
        });
    }
    if !applied.is_empty() {
        tracing::info!(aliases = applied.len(), "Aliased regional locales");
    }
    Ok(applied)
}

/// Locale directories present under `locales_root`, sorted.
pub fn published_locales(locales_root: &Path) -> Result<Vec<String>, BuildError> {
    let mut locales = Vec::new();
    for entry in fs::read_dir(locales_root).map_err(|e| BuildError::io(locales_root, e))? {
        let entry = entry.map_err(|e| BuildError::io(locales_root, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| BuildError::io(entry.path(), e))?;
        if file_type.is_dir() {
            locales.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    locales.sort();
    Ok(locales)
}
