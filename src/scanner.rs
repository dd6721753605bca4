use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::analyzer::{ContentAnalyzer, FileAnalysis};
use crate::catalog::CompiledCatalog;
use crate::config::Config;
use crate::dependency::{LicenseResolver, StaticLicenseResolver};
use crate::report::{aggregate, ScanResult};
use crate::selector::{FileSelector, GitStagedFiles, Selection, SelectionMode, StagedFiles};

/// Runs select → analyze → aggregate against one compiled policy
pub struct Scanner {
    catalog: CompiledCatalog,
    resolver: Box<dyn LicenseResolver>,
    git_timeout: Duration,
}

impl Scanner {
    pub fn new(catalog: CompiledCatalog, resolver: Box<dyn LicenseResolver>) -> Self {
        Self {
            catalog,
            resolver,
            git_timeout: Duration::from_secs(10),
        }
    }

    /// Compile the configured catalog and package table
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = CompiledCatalog::compile(config.catalog.clone()).context("Invalid rule catalog")?;
        let resolver = StaticLicenseResolver::default().with_entries(&config.packages);

        Ok(Self::new(catalog, Box::new(resolver)).with_git_timeout(config.git_timeout()))
    }

    pub fn with_git_timeout(mut self, timeout: Duration) -> Self {
        self.git_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &CompiledCatalog {
        &self.catalog
    }

    /// Scan every candidate under `workspace`
    pub fn scan_workspace(&self, workspace: &Path) -> Result<ScanResult> {
        let root = canonical_workspace(workspace)?;
        let selection = FileSelector::new(&self.catalog).select_full_tree(&root);
        Ok(self.run(root, SelectionMode::Full, selection))
    }

    /// Scan the files git reports as staged
    pub fn scan_git_staged(&self, workspace: &Path) -> Result<ScanResult> {
        self.scan_staged(workspace, &GitStagedFiles::new(self.git_timeout))
    }

    /// Scan the files `source` reports as staged
    pub fn scan_staged(&self, workspace: &Path, source: &dyn StagedFiles) -> Result<ScanResult> {
        let root = canonical_workspace(workspace)?;
        let selection = FileSelector::new(&self.catalog).select_staged(&root, source);
        Ok(self.run(root, SelectionMode::Staged, selection))
    }

    fn run(&self, root: PathBuf, mode: SelectionMode, selection: Selection) -> ScanResult {
        info!("Checking {} files in {}", selection.candidates.len(), root.display());

        let analyzer = ContentAnalyzer::new(&self.catalog, self.resolver.as_ref());
        let analyses: Vec<FileAnalysis> = selection
            .candidates
            .par_iter()
            .map(|candidate| analyzer.analyze_file(&candidate.path, &candidate.relative))
            .collect();

        aggregate(root, mode, analyses, selection.license_files, selection.warnings)
    }
}

fn canonical_workspace(workspace: &Path) -> Result<PathBuf> {
    workspace
        .canonicalize()
        .with_context(|| format!("Workspace not found: {}", workspace.display()))
}

/// Write the full result as pretty JSON. The file only appears once complete.
pub fn write_snapshot(result: &ScanResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize scan result")?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .with_context(|| format!("Failed to write snapshot: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    info!("Saved scan results to {}", path.display());
    Ok(())
}
