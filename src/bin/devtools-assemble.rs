//! DevTools Assembler CLI Binary
//!
//! Command-line interface for assembling the DevTools extension package.

use anyhow::Context;
use clap::Parser;
use devtools_assembler::logging::init_logging;
use devtools_assembler::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.workspace.clone(), cli.config.clone()).with_context(|| {
        format!(
            "Failed to load configuration for workspace {}",
            cli.workspace.display()
        )
    })?;

    let mut logging = context.config().logging.clone();
    logging.apply_cli_overrides(
        cli.log_level.clone(),
        cli.log_format.clone(),
        cli.log_output.clone(),
        cli.log_file.clone(),
    );
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    context.execute(&cli.command).map_err(|e| {
        tracing::error!(error = %e, "Command failed");
        anyhow::Error::new(e)
    })
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
