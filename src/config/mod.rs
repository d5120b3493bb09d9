//! Configuration Management
//!
//! Layered configuration for the assembler: built-in defaults, an optional
//! global file, a workspace `devtools.toml`, then `DEVTOOLS_*` environment
//! variables. Every field has a default, so an empty configuration assembles
//! the stock DevTools package.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::staging_paths::PathsConfig;

use crate::error::BuildError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Complete assembler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub upstream: UpstreamConfig,
    pub paths: PathsConfig,
    pub package: PackageConfig,
    pub locales: LocalesConfig,
    pub readme: ReadmeConfig,
    pub logging: LoggingConfig,
}

/// Upstream repository coordinates and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,

    /// Raw-content host, e.g. `https://raw.githubusercontent.com`
    pub raw_base: String,

    /// REST API host, e.g. `https://api.github.com`
    pub api_base: String,

    /// Environment variable holding the API token
    pub token_env: String,

    pub user_agent: String,

    /// Upper bound on in-flight requests within one phase
    pub max_concurrent_requests: usize,

    /// Per-request timeout; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            owner: "ScratchAddons".to_string(),
            repo: "ScratchAddons".to_string(),
            branch: "master".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            api_base: "https://api.github.com".to_string(),
            token_env: "GH_TOKEN".to_string(),
            user_agent: format!("devtools-assembler/{}", env!("CARGO_PKG_VERSION")),
            max_concurrent_requests: 16,
            request_timeout_secs: None,
        }
    }
}

/// A single upstream file copied to a fixed staging destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownFile {
    /// Path in the upstream repository
    pub source: String,
    /// Path under the staging root
    pub destination: String,
}

impl KnownFile {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }
}

/// What goes into the package besides the local override tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Subdirectories created in staging after the override copy
    pub staging_dirs: Vec<String>,

    /// Upstream directory that holds every addon
    pub addons_dir: String,

    /// Addon fetched recursively from `addons_dir`
    pub addon: String,

    /// Staging directory receiving the addon subtree
    pub addon_dest: String,

    /// Manifest path, both upstream and in staging
    pub manifest: String,

    pub known_files: Vec<KnownFile>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            staging_dirs: vec![
                "_locales".to_string(),
                "addon".to_string(),
                "l10n".to_string(),
                "libraries".to_string(),
            ],
            addons_dir: "addons".to_string(),
            addon: "editor-devtools".to_string(),
            addon_dest: "addon".to_string(),
            manifest: "manifest.json".to_string(),
            known_files: vec![
                KnownFile::new("/libraries/autoescaper.js", "/libraries/autoescaper.js"),
                KnownFile::new(
                    "/libraries/intl-messageformat.umd.min.js",
                    "/libraries/intl-messageformat.umd.min.js",
                ),
                KnownFile::new("/libraries/l10n.js", "/libraries/l10n.js"),
                KnownFile::new("/content-scripts/inject/l10n.js", "/inject/l10n.js"),
            ],
        }
    }
}

/// How an alias rule produces its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasMode {
    Move,
    Copy,
}

/// Regional-variant alias: expose locale `from` under the code `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleAlias {
    pub from: String,
    pub to: String,
    pub mode: AliasMode,
}

/// Localization sources, outputs and projection keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// Upstream directory with one subdirectory per locale
    pub l10n_dir: String,

    /// Per-locale translation document for the addon
    pub translation_file: String,

    /// Per-locale document shared by every addon
    pub shared_file: String,

    /// Staging directory receiving the raw localization files
    pub l10n_dest: String,

    /// Staging directory receiving extension `messages.json` files
    pub messages_dest: String,

    /// Locale whose name backfills locales without one
    pub fallback: String,

    pub name_key: String,
    pub description_key: String,

    /// Applied in order after messages are written
    pub aliases: Vec<LocaleAlias>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            l10n_dir: "addons-l10n".to_string(),
            translation_file: "editor-devtools.json".to_string(),
            shared_file: "_general.json".to_string(),
            l10n_dest: "l10n".to_string(),
            messages_dest: "_locales".to_string(),
            fallback: "en".to_string(),
            name_key: "editor-devtools/help-title".to_string(),
            description_key: "editor-devtools/extension-description-not-for-addon".to_string(),
            aliases: vec![
                LocaleAlias {
                    from: "pt-br".to_string(),
                    to: "pt_BR".to_string(),
                    mode: AliasMode::Move,
                },
                LocaleAlias {
                    from: "pt_BR".to_string(),
                    to: "pt_PT".to_string(),
                    mode: AliasMode::Copy,
                },
            ],
        }
    }
}

/// README replacement performed as the last step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    /// File in staging that becomes the README; `None` disables the swap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    pub target: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            replacement: Some("REAL_README.md".to_string()),
            target: "README.md".to_string(),
        }
    }
}

/// True when `path` stays inside whatever root it is joined onto.
///
/// Leading slashes are accepted since upstream paths are written
/// repository-absolute (`/libraries/l10n.js`).
pub fn is_contained_path(path: &str) -> bool {
    let trimmed = path.trim_start_matches('/');
    !trimmed.is_empty()
        && Path::new(trimmed)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

impl AssemblerConfig {
    /// Reject configurations that cannot produce a package.
    pub fn validate(&self) -> Result<(), BuildError> {
        let upstream = &self.upstream;
        for (field, value) in [
            ("upstream.owner", &upstream.owner),
            ("upstream.repo", &upstream.repo),
            ("upstream.branch", &upstream.branch),
            ("package.addon", &self.package.addon),
            ("locales.name_key", &self.locales.name_key),
            ("locales.description_key", &self.locales.description_key),
            ("locales.fallback", &self.locales.fallback),
        ] {
            if value.trim().is_empty() {
                return Err(BuildError::ConfigError(format!("{} cannot be empty", field)));
            }
        }

        for base in [&upstream.raw_base, &upstream.api_base] {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(BuildError::ConfigError(format!(
                    "Invalid upstream URL: {}",
                    base
                )));
            }
        }

        if upstream.max_concurrent_requests == 0 {
            return Err(BuildError::ConfigError(
                "upstream.max_concurrent_requests must be positive".to_string(),
            ));
        }

        if self
            .paths
            .staging_dir
            .components()
            .all(|c| matches!(c, Component::CurDir))
        {
            return Err(BuildError::ConfigError(
                "paths.staging_dir cannot be empty or the workspace root".to_string(),
            ));
        }

        for file in &self.package.known_files {
            if !is_contained_path(&file.source) || !is_contained_path(&file.destination) {
                return Err(BuildError::ConfigError(format!(
                    "Known file mapping escapes its root: {} -> {}",
                    file.source, file.destination
                )));
            }
        }

        for dir in self
            .package
            .staging_dirs
            .iter()
            .chain([&self.package.addon_dest, &self.locales.l10n_dest, &self.locales.messages_dest])
        {
            if !is_contained_path(dir) {
                return Err(BuildError::ConfigError(format!(
                    "Staging directory escapes the staging root: {}",
                    dir
                )));
            }
        }

        for alias in &self.locales.aliases {
            if !is_contained_path(&alias.from)
                || !is_contained_path(&alias.to)
                || alias.from.contains('/')
                || alias.to.contains('/')
                || alias.from == alias.to
            {
                return Err(BuildError::ConfigError(format!(
                    "Invalid locale alias: {} -> {}",
                    alias.from, alias.to
                )));
            }
        }

        Ok(())
    }
}
