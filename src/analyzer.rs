use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::matcher::file_name;
use crate::catalog::{CompiledCatalog, MentionPolicy};
use crate::dependency::{check_manifest, LicenseResolver, ManifestCheck, ManifestFormat};
use crate::finding::{blocked_rule_id, Finding, RULE_COMMERCIAL, RULE_FILE_ACCESS, RULE_MISSING_HEADER};

/// Everything learned about one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file: PathBuf,
    /// License families named in the file, applied or not
    pub licenses_found: Vec<String>,
    pub findings: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestCheck>,
}

/// Evaluates file contents against a compiled catalog.
///
/// Holds only shared references, so one analyzer can serve every worker thread.
pub struct ContentAnalyzer<'a> {
    catalog: &'a CompiledCatalog,
    resolver: &'a dyn LicenseResolver,
}

impl<'a> ContentAnalyzer<'a> {
    pub fn new(catalog: &'a CompiledCatalog, resolver: &'a dyn LicenseResolver) -> Self {
        Self { catalog, resolver }
    }

    /// Read and analyze one file. `display` is the path findings are attributed to.
    ///
    /// Unreadable or non-UTF-8 files produce a single error finding instead of
    /// failing the scan.
    pub fn analyze_file(&self, path: &Path, display: &Path) -> FileAnalysis {
        let content = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8 text ({})", e)));

        match content {
            Ok(content) => self.analyze_content(display, &content),
            Err(reason) => {
                debug!("Cannot read {}: {}", path.display(), reason);
                FileAnalysis {
                    file: display.to_path_buf(),
                    licenses_found: Vec::new(),
                    findings: vec![Finding::error(
                        RULE_FILE_ACCESS,
                        format!("Failed to read file: {}", reason),
                        display,
                    )],
                    manifest: None,
                }
            }
        }
    }

    /// Analyze already-decoded content. Findings come out in check order:
    /// header, blocked licenses, commercial restrictions, dependencies.
    pub fn analyze_content(&self, path: &Path, content: &str) -> FileAnalysis {
        let content_lower = content.to_lowercase();
        let mut findings = Vec::new();
        let rule_definition = self.catalog.is_rule_definition(path);

        let manifest_format = if self.catalog.catalog.is_manifest(file_name(path)) {
            ManifestFormat::detect(file_name(path))
        } else {
            None
        };

        if manifest_format.is_none()
            && self.catalog.is_source_file(path)
            && !self.catalog.has_license_header(&content_lower)
        {
            findings.push(Finding::warning(RULE_MISSING_HEADER, "No license header found", path));
        }

        let licenses_found = if rule_definition {
            debug!("Skipping license families in rule definition {}", path.display());
            Vec::new()
        } else {
            findings.extend(self.blocked_license_findings(path, content, &content_lower));
            self.licenses_found(content)
        };
        findings.extend(self.commercial_findings(path, &content_lower));

        let manifest = manifest_format.map(|format| {
            let (check, manifest_findings) =
                check_manifest(path, format, content, &self.catalog.catalog, self.resolver);
            findings.extend(manifest_findings);
            check
        });

        FileAnalysis {
            file: path.to_path_buf(),
            licenses_found,
            findings,
            manifest,
        }
    }

    /// Blocked families need more than a name match. Strict families must also
    /// carry a grant clause; policy documents are never treated as declarations.
    fn blocked_license_findings(&self, path: &Path, content: &str, content_lower: &str) -> Vec<Finding> {
        if self.catalog.is_policy_document(path) {
            return Vec::new();
        }

        let mut findings = Vec::new();
        for rule in &self.catalog.blocked {
            if !rule.is_match(content) {
                continue;
            }

            if !rule.rule.strict {
                findings.push(Finding::error(
                    blocked_rule_id(rule.id()),
                    format!("Blocked license {} detected", rule.id()),
                    path,
                ));
                continue;
            }

            match rule.find_grant_clause(content_lower) {
                Some(clause) => findings.push(Finding::error(
                    blocked_rule_id(rule.id()),
                    format!("Blocked license {} applied (\"{}\")", rule.id(), clause),
                    path,
                )),
                None if self.catalog.catalog.bare_mention == MentionPolicy::Warn => {
                    findings.push(Finding::warning(
                        blocked_rule_id(rule.id()),
                        format!("{} mentioned without a license grant", rule.id()),
                        path,
                    ))
                }
                None => debug!("Bare mention of {} in {}", rule.id(), path.display()),
            }
        }
        findings
    }

    fn commercial_findings(&self, path: &Path, content_lower: &str) -> Vec<Finding> {
        self.catalog
            .find_commercial_phrases(content_lower)
            .into_iter()
            .map(|phrase| {
                Finding::error(
                    RULE_COMMERCIAL,
                    format!("Commercial use restriction found: \"{}\"", phrase),
                    path,
                )
            })
            .collect()
    }

    fn licenses_found(&self, content: &str) -> Vec<String> {
        self.catalog
            .blocked
            .iter()
            .chain(&self.catalog.informational)
            .filter(|rule| rule.is_match(content))
            .map(|rule| rule.id().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::dependency::StaticLicenseResolver;
    use crate::finding::Severity;
    use indexmap::IndexMap;

    const GPL_HEADER: &str = "/*\n * This program is free software: you can redistribute it and/or modify\n * it under the terms of the GNU General Public License as published by\n * the Free Software Foundation.\n */\nint main() { return 0; }\n";

    fn analyze_with(catalog: RuleCatalog, path: &str, content: &str) -> FileAnalysis {
        let catalog = CompiledCatalog::compile(catalog).unwrap();
        let resolver = StaticLicenseResolver::default();
        ContentAnalyzer::new(&catalog, &resolver).analyze_content(Path::new(path), content)
    }

    fn analyze(path: &str, content: &str) -> FileAnalysis {
        analyze_with(RuleCatalog::default(), path, content)
    }

    fn errors(analysis: &FileAnalysis) -> Vec<&Finding> {
        analysis.findings.iter().filter(|f| f.is_error()).collect()
    }

    #[test]
    fn test_gpl_grant_clause_is_one_error() {
        let analysis = analyze("src/main.cpp", GPL_HEADER);
        let errors = errors(&analysis);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_id, "blocked-license/GPL");
    }

    #[test]
    fn test_repeated_clause_still_one_error() {
        let content = GPL_HEADER.repeat(5);
        let analysis = analyze("src/main.cpp", &content);

        assert_eq!(errors(&analysis).len(), 1);
    }

    #[test]
    fn test_bare_acronym_is_not_an_error() {
        let analysis = analyze("src/app.js", "// comparable to GPL in spirit\n");

        assert!(errors(&analysis).is_empty());
        assert!(analysis.licenses_found.contains(&"GPL".to_string()));
    }

    #[test]
    fn test_bare_acronym_warns_when_configured() {
        let catalog = RuleCatalog {
            bare_mention: MentionPolicy::Warn,
            ..RuleCatalog::default()
        };
        let analysis = analyze_with(catalog, "src/app.js", "// MIT License\n// unlike AGPL\n");

        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].severity, Severity::Warning);
        assert_eq!(analysis.findings[0].rule_id, "blocked-license/AGPL");
    }

    #[test]
    fn test_other_family_clause_does_not_confirm_gpl() {
        let analysis = analyze("src/wrapper.py", "# MIT License\n# We avoid GPL; this wrapper links an LGPL v2 lib\n");

        assert!(errors(&analysis).is_empty());
    }

    #[test]
    fn test_agpl_clause_does_not_report_gpl() {
        let content = "# under the terms of the GNU Affero General Public License v3\n";
        let analysis = analyze("server.py", content);
        let errors = errors(&analysis);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_id, "blocked-license/AGPL");
    }

    #[test]
    fn test_non_strict_family_flags_on_match() {
        let analysis = analyze("assets/credits.js", "// SPDX-License-Identifier: MIT\n// art: CC-BY-SA 4.0\n");
        let errors = errors(&analysis);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_id, "blocked-license/CC-BY-SA");
    }

    #[test]
    fn test_rule_definition_file_is_never_flagged_for_families() {
        let content = "BLOCKED = ['GPL']\n# This program is free software\n";
        let analysis = analyze("tools/builtin_rules.rs", content);

        assert!(errors(&analysis).is_empty());
    }

    #[test]
    fn test_commercial_phrases_checked_even_in_rule_definitions() {
        let analysis = analyze("tools/builtin_rules.rs", "// MIT License\n// 商用利用禁止\n");
        let errors = errors(&analysis);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_id, RULE_COMMERCIAL);
    }

    #[test]
    fn test_marker_comment_does_not_hide_violations() {
        let plain = analyze("src/model.py", "# MIT License\n# not for commercial use\n");
        let marked = analyze("src/model.py", "# MIT License\n# license-gate:rules\n# not for commercial use\n");
        assert_eq!(errors(&plain).len(), 1);
        assert_eq!(errors(&marked).len(), 1);
        assert_eq!(errors(&marked)[0].rule_id, RULE_COMMERCIAL);

        let gpl = analyze("tools/policy.py", &format!("# license-gate:rules\n{}", GPL_HEADER));
        assert_eq!(errors(&gpl).len(), 1);
        assert_eq!(errors(&gpl)[0].rule_id, "blocked-license/GPL");
    }

    #[test]
    fn test_policy_document_is_not_a_declaration() {
        let catalog = RuleCatalog {
            scan_extensions: vec![".md".to_string()],
            ..RuleCatalog::default()
        };
        let content = "We never accept code under the terms of the GNU General Public License.\n";
        let analysis = analyze_with(catalog, "README.md", content);

        assert!(errors(&analysis).is_empty());
    }

    #[test]
    fn test_commercial_phrases_in_any_language() {
        let analysis = analyze("src/model.py", "# MIT License\n# 商用利用禁止\n# Not for commercial use\n");
        let errors = errors(&analysis);

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|f| f.rule_id == RULE_COMMERCIAL));
    }

    #[test]
    fn test_missing_header_only_for_source_files() {
        let source = analyze("src/util.ts", "export const x = 1;\n");
        assert_eq!(source.findings.len(), 1);
        assert_eq!(source.findings[0].rule_id, RULE_MISSING_HEADER);
        assert_eq!(source.findings[0].severity, Severity::Warning);

        let manifest = analyze("requirements.txt", "fastapi==0.104.1\n");
        assert!(manifest.findings.is_empty());
    }

    #[test]
    fn test_header_present_means_no_warning() {
        let analysis = analyze("src/util.py", "# Copyright (c) 2024 Acme\n# MIT License\nx = 1\n");

        assert!(analysis.findings.is_empty());
        assert_eq!(analysis.licenses_found, vec!["MIT".to_string()]);
    }

    #[test]
    fn test_manifest_dispatch_merges_dependency_findings() {
        let catalog = CompiledCatalog::compile(RuleCatalog::default()).unwrap();
        let resolver = StaticLicenseResolver::default().with_entries(&IndexMap::from([(
            "somegplpkg".to_string(),
            "GPL".to_string(),
        )]));
        let analyzer = ContentAnalyzer::new(&catalog, &resolver);

        let analysis = analyzer.analyze_content(
            Path::new("webapi/requirements.txt"),
            "requests==2.31.0\nsomegplpkg==0.1\n",
        );

        let manifest = analysis.manifest.unwrap();
        assert_eq!(manifest.packages.len(), 2);
        assert!(manifest.has_blocked_packages);
        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].rule_id, "dependency-license");
    }

    #[test]
    fn test_unreadable_file_is_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.py");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let catalog = CompiledCatalog::compile(RuleCatalog::default()).unwrap();
        let resolver = StaticLicenseResolver::default();
        let analysis = ContentAnalyzer::new(&catalog, &resolver).analyze_file(&path, Path::new("blob.py"));

        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].rule_id, RULE_FILE_ACCESS);
        assert!(analysis.findings[0].is_error());

        let missing = ContentAnalyzer::new(&catalog, &resolver)
            .analyze_file(&dir.path().join("gone.py"), Path::new("gone.py"));
        assert_eq!(missing.findings.len(), 1);
        assert_eq!(missing.findings[0].rule_id, RULE_FILE_ACCESS);
    }
}
