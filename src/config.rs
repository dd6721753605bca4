use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::catalog::RuleCatalog;

pub const CONFIG_FILE_NAME: &str = ".license-gate.toml";
pub const DEFAULT_SNAPSHOT_FILE: &str = "license_scan_results.json";
const PYPROJECT_TOOL_KEY: &str = "license-gate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output format (text, json)
    pub format: Option<String>,

    /// Write the JSON snapshot after a scan
    pub snapshot: Option<bool>,

    /// Snapshot file name, relative to the workspace
    pub snapshot_file: Option<String>,

    /// Upper bound for the staged-files query
    pub git_timeout_secs: Option<u64>,

    /// Scan policy
    #[serde(default)]
    pub catalog: RuleCatalog,

    /// Extra package → license entries for dependency resolution
    #[serde(default)]
    pub packages: IndexMap<String, String>,

    /// Where this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some("text".to_string()),
            snapshot: Some(true),
            snapshot_file: Some(DEFAULT_SNAPSHOT_FILE.to_string()),
            git_timeout_secs: Some(10),
            catalog: RuleCatalog::default(),
            packages: IndexMap::new(),
            source: None,
        }
    }
}

impl Config {
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs.unwrap_or(10))
    }

    pub fn snapshot_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(self.snapshot_file.as_deref().unwrap_or(DEFAULT_SNAPSHOT_FILE))
    }
}

/// Load configuration for a workspace.
///
/// An explicit path wins; otherwise `.license-gate.toml`, then the
/// `[tool.license-gate]` table of `pyproject.toml`, then built-in defaults.
pub fn load_config(workspace: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let config_path = workspace.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return load_config_file(&config_path);
    }

    let pyproject_path = workspace.join("pyproject.toml");
    if pyproject_path.exists() {
        if let Some(config) = load_from_pyproject(&pyproject_path)? {
            return Ok(config);
        }
    }

    debug!("No configuration found, using built-in policy");
    Ok(Config::default())
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    config.source = Some(path.to_path_buf());

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn load_from_pyproject(path: &Path) -> Result<Option<Config>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pyproject.toml: {}", path.display()))?;

    let pyproject: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse pyproject.toml: {}", path.display()))?;

    // Extract [tool.license-gate] section
    let Some(section) = pyproject.get("tool").and_then(|tool| tool.get(PYPROJECT_TOOL_KEY)) else {
        return Ok(None);
    };

    let mut config: Config = section
        .clone()
        .try_into()
        .context("Failed to parse [tool.license-gate] section")?;
    config.source = Some(path.to_path_buf());
    Ok(Some(config))
}
