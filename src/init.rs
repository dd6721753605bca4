use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE_NAME};

const HEADER: &str = "\
# Policy for license-gate. Remove any key to fall back to the built-in value.

";

/// Write the built-in policy as `.license-gate.toml` in `workspace`.
///
/// The file name is one of the catalog's self files, so scanning the
/// workspace never reports the patterns it lists.
pub fn generate_config(workspace: &Path, force: bool) -> Result<PathBuf> {
    let path = workspace.join(CONFIG_FILE_NAME);

    if path.exists() && !force {
        bail!("{} already exists. Use --force to overwrite it.", path.display());
    }

    let content = default_config_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write config: {}", path.display()))?;

    Ok(path)
}

pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;
    Ok(format!("{}{}", HEADER, body))
}
