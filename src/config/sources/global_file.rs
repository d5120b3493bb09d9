//! Global file source: $XDG_CONFIG_HOME/devtools-assembler/config.toml

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;

pub fn config_path() -> Option<PathBuf> {
    xdg::app_config_dir()
        .ok()
        .map(|dir| dir.join("config.toml"))
}

/// Add the global config file when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match config_path() {
        Some(path) => Ok(builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )),
        None => Ok(builder),
    }
}
