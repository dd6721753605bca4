use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use crate::cli::OutputFormat;
use license_gate::config::load_config;
use license_gate::output::format_text_report;
use license_gate::{write_snapshot, Scanner, StaticStagedFiles};

/// Run one scan and return the process exit status
#[allow(clippy::too_many_arguments)]
pub fn handle_scan(
    workspace: PathBuf,
    staged_only: bool,
    staged_files: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    format: Option<OutputFormat>,
    no_snapshot: bool,
    quiet: bool,
    verbose: bool,
) -> Result<i32> {
    let config = load_config(&workspace, config_path.as_deref())?;
    let scanner = Scanner::from_config(&config)?;

    // An injected list always means staged mode
    let result = if !staged_files.is_empty() {
        debug!("Using {} injected staged paths", staged_files.len());
        scanner.scan_staged(&workspace, &StaticStagedFiles::new(staged_files))?
    } else if staged_only {
        scanner.scan_git_staged(&workspace)?
    } else {
        scanner.scan_workspace(&workspace)?
    };

    // CLI arguments override config values
    let format = format.unwrap_or_else(|| match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    if quiet {
        if result.is_blocked() {
            eprintln!("{} license violation(s) found", result.summary.error_count);
        }
    } else {
        let output = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&result).context("Failed to serialize scan result")?,
            OutputFormat::Text => format_text_report(&result, verbose),
        };
        println!("{}", output);
    }

    if !no_snapshot && config.snapshot.unwrap_or(true) {
        write_snapshot(&result, &config.snapshot_path(&result.project_path))?;
    }

    Ok(result.exit_code())
}
