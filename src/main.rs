use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Exit status for configuration, I/O and other operational failures
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let quiet = cli.quiet;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Scan {
            workspace,
            staged_only,
            staged_files,
            config,
            format,
            no_snapshot,
        } => {
            let code = commands::handle_scan(
                workspace,
                staged_only,
                staged_files,
                config,
                format,
                no_snapshot,
                quiet,
                verbose,
            )?;
            Ok(if code == 0 { 0 } else { 1 })
        }
        Commands::Init { workspace, force } => {
            commands::handle_init(&workspace, force, quiet)?;
            Ok(0)
        }
        Commands::Config {
            workspace,
            config,
            show,
            validate,
        } => {
            commands::handle_config(&workspace, config.as_deref(), show, validate, quiet)?;
            Ok(0)
        }
    }
}
