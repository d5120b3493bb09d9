//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AssemblerConfig;
use crate::error::BuildError;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Get the global config file path (~/.config/devtools-assembler/config.toml)
    #[cfg(test)]
    pub(crate) fn global_config_path() -> Option<PathBuf> {
        super::sources::global_file::config_path()
    }

    /// Load configuration from files and environment, then validate it.
    pub fn load(workspace_root: &Path) -> Result<AssemblerConfig, BuildError> {
        let config = MergeService::load(workspace_root)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, then validate it.
    pub fn load_from_file(path: &Path) -> Result<AssemblerConfig, BuildError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> AssemblerConfig {
        AssemblerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_config_path_ends_with_config_toml() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("devtools-assembler/config.toml"));
        }
    }

    #[test]
    fn load_from_file_rejects_invalid_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[upstream]\nmax_concurrent_requests = 0\n").unwrap();
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("max_concurrent_requests"));
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("devtools.toml");
        std::fs::write(
            &path,
            "[package]\naddon = \"debugger\"\n\n[locales]\nfallback = \"de\"\n",
        )
        .unwrap();
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.package.addon, "debugger");
        assert_eq!(config.locales.fallback, "de");
        assert_eq!(config.package.addons_dir, "addons");
    }
}
