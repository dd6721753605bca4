use serde::{Deserialize, Serialize};

use super::builtin_rules;

/// How a rule participates in the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Allowed,
    Blocked,
    Informational,
}

/// What to do when a strict family is named but never applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionPolicy {
    #[default]
    Ignore,
    Warn,
}

/// A license family with its detection pattern.
///
/// `pattern` is a regular expression, matched case-insensitively. For strict
/// rules a pattern hit is only a candidate: one of `grant_clauses` must also be
/// present before the license counts as applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRule {
    pub id: String,
    pub pattern: String,
    pub category: RuleCategory,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub grant_clauses: Vec<String>,
}

impl LicenseRule {
    pub fn blocked(id: &str, pattern: &str, strict: bool, grant_clauses: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            category: RuleCategory::Blocked,
            strict,
            grant_clauses: grant_clauses.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn informational(id: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            category: RuleCategory::Informational,
            strict: false,
            grant_clauses: Vec::new(),
        }
    }
}

/// The policy a scan is evaluated against.
///
/// Built once per process and shared read-only by every analyzer. Any field
/// missing from a config file falls back to the built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCatalog {
    /// License names accepted for dependencies
    pub allowed_licenses: Vec<String>,
    /// Phrases forbidding commercial use, in any language
    pub commercial_phrases: Vec<String>,
    /// Path fragments or glob patterns skipped before reading
    pub exclusions: Vec<String>,
    /// Extensions (with leading dot) that make a file a candidate
    pub scan_extensions: Vec<String>,
    /// Extensions that must carry a license header
    pub source_extensions: Vec<String>,
    /// Dependency manifest file names
    pub manifest_files: Vec<String>,
    /// File stems of documents describing licensing policy
    pub policy_documents: Vec<String>,
    /// File names of the scanner's own rule definitions
    pub self_files: Vec<String>,
    /// Strings that count as a license header on their own
    pub header_signatures: Vec<String>,
    pub bare_mention: MentionPolicy,
    pub unknown_dependency: MentionPolicy,
    /// License families that block a commit or build
    pub blocked_rules: Vec<LicenseRule>,
    /// Families recorded as "found" but never reported
    pub informational_rules: Vec<LicenseRule>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            allowed_licenses: to_strings(builtin_rules::ALLOWED_LICENSES),
            commercial_phrases: to_strings(builtin_rules::COMMERCIAL_PHRASES),
            exclusions: to_strings(builtin_rules::EXCLUSIONS),
            scan_extensions: to_strings(builtin_rules::SCAN_EXTENSIONS),
            source_extensions: to_strings(builtin_rules::SOURCE_EXTENSIONS),
            manifest_files: to_strings(builtin_rules::MANIFEST_FILES),
            policy_documents: to_strings(builtin_rules::POLICY_DOCUMENTS),
            self_files: to_strings(builtin_rules::SELF_FILES),
            header_signatures: to_strings(builtin_rules::HEADER_SIGNATURES),
            bare_mention: MentionPolicy::Ignore,
            unknown_dependency: MentionPolicy::Ignore,
            blocked_rules: builtin_rules::blocked_rules(),
            informational_rules: builtin_rules::informational_rules(),
        }
    }
}

impl RuleCatalog {
    pub fn is_allowed_license(&self, license: &str) -> bool {
        self.allowed_licenses
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(license))
    }

    /// A license is blocked when it names a blocked family exactly
    pub fn is_blocked_license(&self, license: &str) -> bool {
        self.blocked_rules
            .iter()
            .any(|rule| rule.id.eq_ignore_ascii_case(license))
            || builtin_rules::BLOCKED_LICENSE_ALIASES
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(license))
    }

    pub fn is_manifest(&self, file_name: &str) -> bool {
        self.manifest_files.iter().any(|m| m == file_name)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
