use anyhow::{bail, Context, Result};
use glob::Pattern;
use regex::{Regex, RegexBuilder};
use std::path::Path;

use super::rules::{LicenseRule, RuleCatalog};

/// A license rule with its pattern compiled
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: LicenseRule,
    regex: Regex,
    clauses: Vec<String>,
}

impl CompiledRule {
    fn compile(rule: &LicenseRule) -> Result<Self> {
        if rule.grant_clauses.iter().any(|c| c.trim().is_empty()) {
            bail!("Empty grant clause for license rule '{}'", rule.id);
        }
        if rule.strict && rule.grant_clauses.is_empty() {
            bail!("Strict license rule '{}' has no grant clauses", rule.id);
        }

        let regex = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid pattern for license rule '{}'", rule.id))?;

        Ok(Self {
            rule: rule.clone(),
            regex,
            clauses: rule.grant_clauses.iter().map(|c| c.to_lowercase()).collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.rule.id
    }

    pub fn is_match(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Returns the first grant clause found in already-lowercased content.
    /// Clauses match on word boundaries, so "GPL v2" is not found in "LGPL v2".
    pub fn find_grant_clause(&self, content_lower: &str) -> Option<&str> {
        self.rule
            .grant_clauses
            .iter()
            .zip(&self.clauses)
            .find(|(_, lower)| contains_word(content_lower, lower))
            .map(|(original, _)| original.as_str())
    }
}

/// One exclusion entry: a glob when it carries glob syntax, a substring otherwise
#[derive(Debug)]
enum Exclusion {
    Fragment(String),
    Glob(Pattern),
}

impl Exclusion {
    fn parse(entry: &str) -> Result<Self> {
        if entry.contains(['*', '?', '[']) {
            let pattern = Pattern::new(entry)
                .with_context(|| format!("Invalid exclusion pattern '{}'", entry))?;
            Ok(Self::Glob(pattern))
        } else {
            Ok(Self::Fragment(entry.to_string()))
        }
    }

    fn matches(&self, relative: &str) -> bool {
        match self {
            Self::Fragment(fragment) => relative.contains(fragment.as_str()),
            Self::Glob(pattern) => {
                pattern.matches(relative)
                    || relative
                        .rsplit('/')
                        .next()
                        .is_some_and(|name| pattern.matches(name))
            }
        }
    }
}

/// The catalog with every pattern validated and compiled, ready to share
/// across analyzer threads.
#[derive(Debug)]
pub struct CompiledCatalog {
    pub catalog: RuleCatalog,
    pub blocked: Vec<CompiledRule>,
    pub informational: Vec<CompiledRule>,
    exclusions: Vec<Exclusion>,
    commercial_lower: Vec<String>,
    header_signatures_lower: Vec<String>,
    license_names_lower: Vec<String>,
}

impl CompiledCatalog {
    pub fn compile(catalog: RuleCatalog) -> Result<Self> {
        let blocked = catalog
            .blocked_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        let informational = catalog
            .informational_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        let exclusions = catalog
            .exclusions
            .iter()
            .map(|e| Exclusion::parse(e))
            .collect::<Result<Vec<_>>>()?;

        if catalog.commercial_phrases.iter().any(|p| p.trim().is_empty()) {
            bail!("Empty commercial restriction phrase in rule catalog");
        }

        let commercial_lower = catalog.commercial_phrases.iter().map(|p| p.to_lowercase()).collect();
        let header_signatures_lower = catalog.header_signatures.iter().map(|s| s.to_lowercase()).collect();
        let license_names_lower = catalog
            .allowed_licenses
            .iter()
            .chain(catalog.blocked_rules.iter().map(|r| &r.id))
            .chain(catalog.informational_rules.iter().map(|r| &r.id))
            .map(|name| name.to_lowercase())
            .collect();

        Ok(Self {
            catalog,
            blocked,
            informational,
            exclusions,
            commercial_lower,
            header_signatures_lower,
            license_names_lower,
        })
    }

    /// True when a workspace-relative path (forward slashes) must be skipped
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclusions.iter().any(|e| e.matches(relative)) || self.is_self_file(relative)
    }

    /// True for the scanner's own rule-definition files, matched by file name
    pub fn is_self_file(&self, relative: &str) -> bool {
        let name = relative.rsplit('/').next().unwrap_or(relative);
        self.catalog.self_files.iter().any(|f| f == name)
    }

    /// Rule-definition data is identified by file name only. Such files are
    /// never searched for the license families they define.
    pub fn is_rule_definition(&self, path: &Path) -> bool {
        let name = file_name(path);
        self.catalog.self_files.iter().any(|f| f == name)
    }

    pub fn is_policy_document(&self, path: &Path) -> bool {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        self.catalog.policy_documents.iter().any(|doc| {
            let doc = doc.to_uppercase();
            stem == doc || stem.starts_with(&format!("{doc}.")) || stem.starts_with(&format!("{doc}-"))
        })
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        has_extension(path, &self.catalog.source_extensions)
    }

    /// Candidates are scannable source files and recognised manifests
    pub fn is_candidate(&self, path: &Path) -> bool {
        has_extension(path, &self.catalog.scan_extensions) || self.catalog.is_manifest(file_name(path))
    }

    /// Commercial-restriction phrases present in already-lowercased content
    pub fn find_commercial_phrases<'a>(&'a self, content_lower: &str) -> Vec<&'a str> {
        self.catalog
            .commercial_phrases
            .iter()
            .zip(&self.commercial_lower)
            .filter(|(_, lower)| content_lower.contains(lower.as_str()))
            .map(|(original, _)| original.as_str())
            .collect()
    }

    /// A header is a known signature, or "copyright" next to a license name
    pub fn has_license_header(&self, content_lower: &str) -> bool {
        if self.header_signatures_lower.iter().any(|s| content_lower.contains(s.as_str())) {
            return true;
        }

        content_lower.contains("copyright")
            && self.license_names_lower.iter().any(|name| contains_word(content_lower, name))
    }
}

/// Substring search that refuses matches glued to other alphanumerics,
/// so "mit" is not found inside "commit".
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub(crate) fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}
