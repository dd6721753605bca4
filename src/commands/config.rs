use anyhow::{bail, Context, Result};
use std::path::Path;

use license_gate::config::load_config;
use license_gate::CompiledCatalog;

pub fn handle_config(
    workspace: &Path,
    config_path: Option<&Path>,
    show: bool,
    validate: bool,
    quiet: bool,
) -> Result<()> {
    if !show && !validate {
        bail!("Use --show or --validate");
    }

    let config = load_config(workspace, config_path)?;

    if show && !quiet {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if validate {
        CompiledCatalog::compile(config.catalog.clone()).context("Configuration validation failed")?;
        if !quiet {
            match &config.source {
                Some(source) => println!("✅ Configuration is valid ({})", source.display()),
                None => println!("✅ No configuration file found; built-in policy is valid"),
            }
        }
    }

    Ok(())
}
