//! XDG Base Directory utilities for assembler configuration.

use crate::error::BuildError;
use std::path::PathBuf;

/// Directory name used under XDG roots.
pub const APP_DIR: &str = "devtools-assembler";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
/// Follows XDG Base Directory Specification
pub fn config_home() -> Result<PathBuf, BuildError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        BuildError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Get the assembler's config directory
///
/// Returns `$XDG_CONFIG_HOME/devtools-assembler/`. Not created here; the
/// global config file is optional.
pub fn app_config_dir() -> Result<PathBuf, BuildError> {
    Ok(config_home()?.join(APP_DIR))
}
