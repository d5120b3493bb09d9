//! Error types for package assembly.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while assembling the DevTools package.
///
/// Every variant is fatal to a run. The only tolerated failure (a locale
/// whose translation document is not published yet) never surfaces as an
/// error; the localization merger maps it to a skipped locale instead.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Fallback locale '{locale}' has no extension name to copy into {missing:?}")]
    MissingFallback { locale: String, missing: Vec<String> },

    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl BuildError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        BuildError::Json {
            context: context.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for BuildError {
    fn from(err: config::ConfigError) -> Self {
        BuildError::ConfigError(err.to_string())
    }
}
