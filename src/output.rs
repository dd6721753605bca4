use crate::dependency::DependencyStatus;
use crate::finding::Finding;
use crate::report::{FileStatus, OverallStatus, RequirementsCheck, ScanResult};
use crate::selector::SelectionMode;

const RULE: &str = "============================================================";

pub fn format_text_report(result: &ScanResult, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &result.summary;

    output.push_str(&format!("{}\n", RULE));
    output.push_str("License Compliance Report\n");
    output.push_str(&format!("{}\n", RULE));
    output.push_str(&format!("Project: {}\n", result.project_path.display()));
    output.push_str(&format!(
        "Mode: {}\n",
        match result.mode {
            SelectionMode::Full => "full tree",
            SelectionMode::Staged => "staged files",
        }
    ));
    output.push_str(&format!(
        "Overall status: {}\n",
        match summary.overall_status {
            OverallStatus::Ok => "OK",
            OverallStatus::Blocked => "BLOCKED",
        }
    ));
    output.push_str(&format!(
        "Files: {} checked, {} compliant, {} with warnings, {} blocked\n\n",
        summary.total_files, summary.compliant_files, summary.warning_files, summary.blocked_files
    ));

    if result.files_checked.is_empty() {
        output.push_str("No files were checked.\n");
    } else {
        output.push_str("File check results:\n");
        for file in &result.files_checked {
            let icon = match file.status {
                FileStatus::Ok => "✅",
                FileStatus::Warning => "⚠️ ",
                FileStatus::Blocked => "❌",
            };
            output.push_str(&format!("  {} {}\n", icon, file.file.display()));
            if verbose && !file.licenses_found.is_empty() {
                output.push_str(&format!("      licenses mentioned: {}\n", file.licenses_found.join(", ")));
            }
        }
    }

    let errors: Vec<&Finding> = result.errors().collect();
    if !errors.is_empty() {
        output.push_str(&format!("\n❌ Errors ({}):\n", errors.len()));
        output.push_str(&format_findings(&errors));
    }

    let warnings: Vec<&Finding> = result.warnings_found().collect();
    if !warnings.is_empty() {
        output.push_str(&format!("\n⚠️  Warnings ({}):\n", warnings.len()));
        output.push_str(&format_findings(&warnings));
    }

    if let Some(requirements) = &result.requirements_check {
        output.push_str("\n📦 Dependency check results:\n");
        output.push_str(&format_dependency_table(requirements));
    }

    if !result.warnings.is_empty() {
        output.push_str("\nScan notes:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    if !result.license_files.is_empty() && verbose {
        output.push_str("\nLicense files:\n");
        for file in &result.license_files {
            output.push_str(&format!("  {}\n", file.display()));
        }
    }

    output.push_str(&format!("\nCompliance rate: {:.1}%\n", summary.compliance_rate));
    output.push_str(&closing_line(result));
    output.push('\n');

    output
}

fn closing_line(result: &ScanResult) -> String {
    match (result.is_blocked(), result.mode) {
        (true, SelectionMode::Staged) => format!(
            "🚫 {} license violation(s) in staged files - commit blocked",
            result.summary.error_count
        ),
        (true, SelectionMode::Full) => format!(
            "🚫 {} license violation(s) detected - build blocked",
            result.summary.error_count
        ),
        (false, SelectionMode::Staged) => "✅ Staged files passed the license check - commit allowed".to_string(),
        (false, SelectionMode::Full) => "✅ License check complete - no violations".to_string(),
    }
}

fn format_findings(findings: &[&Finding]) -> String {
    let mut output = String::new();
    for finding in findings {
        output.push_str(&format!(
            "  {} [{}] {}\n",
            finding.file.display(),
            finding.rule_id,
            finding.message
        ));
    }
    output
}

fn format_dependency_table(requirements: &RequirementsCheck) -> String {
    let mut output = String::new();

    for manifest in &requirements.manifests {
        output.push_str(&format!("  {}\n", manifest.manifest.display()));
        if manifest.packages.is_empty() {
            output.push_str("  No dependencies declared.\n");
            continue;
        }

        output.push_str("  ┌─────────────────────────┬──────────────┬─────────┐\n");
        output.push_str("  │ Package                 │ License      │ Status  │\n");
        output.push_str("  ├─────────────────────────┼──────────────┼─────────┤\n");
        for package in &manifest.packages {
            let status = match package.status {
                DependencyStatus::Allowed => "✅ OK",
                DependencyStatus::Blocked => "❌ BLOCK",
                DependencyStatus::Unknown => "❔ ?",
            };
            output.push_str(&format!(
                "  │ {:<23} │ {:<12} │ {:<7} │\n",
                truncate(&package.package, 23),
                truncate(&package.license, 12),
                status
            ));
        }
        output.push_str("  └─────────────────────────┴──────────────┴─────────┘\n");
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    }
}
