//! CLI Tooling
//!
//! Command-line interface for assembling the DevTools package. Every command
//! runs against a workspace root whose `devtools.toml` (if any) configures it.

use crate::assemble::Assembler;
use crate::config::{AssemblerConfig, ConfigLoader};
use crate::error::BuildError;
use crate::fetch::plan_subtree;
use crate::l10n::discover_locales;
use crate::tooling::format::{format_build_report_text, format_locales_text, format_plan_text};
use crate::upstream;
use clap::{Args, Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;

/// DevTools assembler - builds the extension package from upstream sources
#[derive(Parser)]
#[command(name = "devtools-assemble")]
#[command(about = "Assemble the DevTools extension package from upstream ScratchAddons sources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Where to read upstream files from.
#[derive(Args, Clone, Debug, Default)]
pub struct UpstreamArgs {
    /// Read upstream files from a local checkout instead of GitHub
    #[arg(long)]
    pub mirror: Option<PathBuf>,

    /// Upstream branch to fetch from
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wipe staging and assemble the package
    Build {
        #[command(flatten)]
        upstream: UpstreamArgs,
        /// Staging directory (wiped on every run)
        #[arg(long)]
        staging: Option<PathBuf>,
        /// Override directory copied into staging first
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the addon subtree download plan without writing anything
    Plan {
        #[command(flatten)]
        upstream: UpstreamArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the locales published upstream
    Locales {
        #[command(flatten)]
        upstream: UpstreamArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context: workspace root plus its loaded configuration.
pub struct CliContext {
    workspace_root: PathBuf,
    config: AssemblerConfig,
}

fn check_format(format: &str) -> Result<(), BuildError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(BuildError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, BuildError> {
    serde_json::to_string_pretty(value).map_err(|e| BuildError::json("command output", e))
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, BuildError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Config with command-line upstream overrides applied.
    fn config_with(&self, upstream: &UpstreamArgs) -> Result<AssemblerConfig, BuildError> {
        let mut config = self.config.clone();
        if let Some(mirror) = &upstream.mirror {
            config.paths.mirror_dir = Some(mirror.clone());
        }
        if let Some(branch) = &upstream.branch {
            config.upstream.branch = branch.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn block_on<F: Future>(future: F) -> Result<F::Output, BuildError> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| BuildError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        Ok(rt.block_on(future))
    }

    /// Execute a command and return its output
    pub fn execute(&self, command: &Commands) -> Result<String, BuildError> {
        match command {
            Commands::Build {
                upstream,
                staging,
                source,
                format,
            } => {
                check_format(format)?;
                let mut config = self.config_with(upstream)?;
                if let Some(staging) = staging {
                    config.paths.staging_dir = staging.clone();
                }
                if let Some(source) = source {
                    config.paths.source_dir = source.clone();
                }
                config.validate()?;
                let source = upstream::from_config(&config, &self.workspace_root)?;
                let assembler = Assembler::new(source, config, &self.workspace_root);
                let report = Self::block_on(assembler.run())??;
                if format == "json" {
                    to_json(&report)
                } else {
                    Ok(format_build_report_text(&report))
                }
            }
            Commands::Plan { upstream, format } => {
                check_format(format)?;
                let config = self.config_with(upstream)?;
                let source = upstream::from_config(&config, &self.workspace_root)?;
                let plan = Self::block_on(plan_subtree(source.as_ref(), &config.package))??;
                if format == "json" {
                    to_json(&plan)
                } else {
                    Ok(format_plan_text(&config.package.addon, &plan))
                }
            }
            Commands::Locales { upstream, format } => {
                check_format(format)?;
                let config = self.config_with(upstream)?;
                let source = upstream::from_config(&config, &self.workspace_root)?;
                let locales =
                    Self::block_on(discover_locales(source.as_ref(), &config.locales.l10n_dir))??;
                if format == "json" {
                    to_json(&locales)
                } else {
                    Ok(format_locales_text(&locales))
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| BuildError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }
}
