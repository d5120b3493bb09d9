//! Base builder shared by every load path.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start an empty builder.
///
/// Defaults live on the config structs (`#[serde(default)]`), so sources only
/// need to carry the keys they override.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder())
}
