use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::analyzer::FileAnalysis;
use crate::dependency::ManifestCheck;
use crate::finding::{Finding, Severity};
use crate::selector::SelectionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Ok,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Warning,
    Blocked,
}

/// Per-file entry of a scan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub status: FileStatus,
    pub licenses_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_files: usize,
    /// Files with no finding of any severity
    pub compliant_files: usize,
    /// Files with at least one error
    pub blocked_files: usize,
    /// Files with warnings but no errors
    pub warning_files: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub compliance_rate: f64,
    pub overall_status: OverallStatus,
}

impl Summary {
    /// Derive the summary from findings. `compliance_rate` is 0 for an empty scan.
    pub fn compute(files_checked: &[PathBuf], findings: &[Finding]) -> Self {
        let by_file = file_statuses(findings);
        let statuses: Vec<FileStatus> = files_checked.iter().map(|f| status_of(&by_file, f)).collect();

        let total_files = files_checked.len();
        let compliant_files = statuses.iter().filter(|s| **s == FileStatus::Ok).count();
        let blocked_files = statuses.iter().filter(|s| **s == FileStatus::Blocked).count();
        let warning_files = total_files - compliant_files - blocked_files;
        let error_count = findings.iter().filter(|f| f.severity == Severity::Error).count();
        let warning_count = findings.len() - error_count;

        let compliance_rate = if total_files > 0 {
            compliant_files as f64 / total_files as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_files,
            compliant_files,
            blocked_files,
            warning_files,
            error_count,
            warning_count,
            compliance_rate,
            overall_status: if error_count > 0 { OverallStatus::Blocked } else { OverallStatus::Ok },
        }
    }
}

/// Status of every file that has findings, in one pass. Any error blocks a
/// file; files missing from the map are compliant.
pub fn file_statuses(findings: &[Finding]) -> HashMap<&Path, FileStatus> {
    let mut statuses = HashMap::new();
    for finding in findings {
        let status = statuses.entry(finding.file.as_path()).or_insert(FileStatus::Warning);
        if finding.is_error() {
            *status = FileStatus::Blocked;
        }
    }
    statuses
}

fn status_of(statuses: &HashMap<&Path, FileStatus>, file: &Path) -> FileStatus {
    statuses.get(file).copied().unwrap_or(FileStatus::Ok)
}

/// Aggregated dependency resolution across every manifest in the scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementsCheck {
    pub manifests: Vec<ManifestCheck>,
    pub has_blocked_packages: bool,
    pub status: OverallStatus,
}

/// Outcome of one scan invocation; also the on-disk snapshot schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub project_path: PathBuf,
    pub mode: SelectionMode,
    pub generated_at: DateTime<Utc>,
    pub files_checked: Vec<FileReport>,
    pub license_files: Vec<PathBuf>,
    pub requirements_check: Option<RequirementsCheck>,
    /// Sorted by file, then by discovery order within the file
    pub findings: Vec<Finding>,
    /// Scan-level problems not tied to a file
    pub warnings: Vec<String>,
    pub summary: Summary,
}

impl ScanResult {
    pub fn is_blocked(&self) -> bool {
        self.summary.overall_status == OverallStatus::Blocked
    }

    /// Process exit status: 1 when any error was found
    pub fn exit_code(&self) -> i32 {
        if self.is_blocked() {
            1
        } else {
            0
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings_found(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }
}

/// Merge per-file analyses into a single result.
///
/// Analyses may arrive in any order; findings are sorted by file with a
/// stable sort so each file keeps its own discovery order.
pub fn aggregate(
    project_path: PathBuf,
    mode: SelectionMode,
    analyses: Vec<FileAnalysis>,
    license_files: Vec<PathBuf>,
    warnings: Vec<String>,
) -> ScanResult {
    let mut files = Vec::with_capacity(analyses.len());
    let mut findings = Vec::new();
    let mut manifests = Vec::new();

    for analysis in analyses {
        files.push((analysis.file, analysis.licenses_found));
        findings.extend(analysis.findings);
        if let Some(manifest) = analysis.manifest {
            manifests.push(manifest);
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    findings.sort_by(|a, b| a.file.cmp(&b.file));
    manifests.sort_by(|a, b| a.manifest.cmp(&b.manifest));

    let requirements_check = if manifests.is_empty() {
        None
    } else {
        let has_blocked_packages = manifests.iter().any(|m| m.has_blocked_packages);
        Some(RequirementsCheck {
            manifests,
            has_blocked_packages,
            status: if has_blocked_packages { OverallStatus::Blocked } else { OverallStatus::Ok },
        })
    };

    let paths: Vec<PathBuf> = files.iter().map(|(file, _)| file.clone()).collect();
    let summary = Summary::compute(&paths, &findings);
    let by_file = file_statuses(&findings);
    let files_checked = files
        .into_iter()
        .map(|(file, licenses_found)| FileReport {
            status: status_of(&by_file, &file),
            file,
            licenses_found,
        })
        .collect();

    ScanResult {
        project_path,
        mode,
        generated_at: Utc::now(),
        files_checked,
        license_files,
        requirements_check,
        findings,
        warnings,
        summary,
    }
}
