use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{MentionPolicy, RuleCatalog};
use crate::finding::{Finding, RULE_DEPENDENCY};

pub mod manifest;

pub use manifest::{requirement_name, ManifestFormat};

/// Resolves a package name to its declared license.
///
/// The analyzer only sees this trait, so a registry-backed client can replace
/// the static table without touching content analysis.
pub trait LicenseResolver: Send + Sync {
    fn resolve(&self, package: &str) -> Option<String>;
}

/// Name → license lookup backed by a fixed table. Keys are case-insensitive.
#[derive(Debug, Clone)]
pub struct StaticLicenseResolver {
    table: IndexMap<String, String>,
}

const KNOWN_LICENSES: &[(&str, &str)] = &[
    ("fastapi", "MIT"),
    ("uvicorn", "BSD-3-Clause"),
    ("pydantic", "MIT"),
    ("sqlalchemy", "MIT"),
    ("requests", "Apache-2.0"),
    ("numpy", "BSD-3-Clause"),
    ("pandas", "BSD-3-Clause"),
    ("react", "MIT"),
    ("react-dom", "MIT"),
    ("vite", "MIT"),
    ("express", "MIT"),
    ("typescript", "Apache-2.0"),
];

impl Default for StaticLicenseResolver {
    fn default() -> Self {
        Self::new(KNOWN_LICENSES.iter().map(|(name, license)| (name.to_string(), license.to_string())))
    }
}

impl StaticLicenseResolver {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let table = entries
            .into_iter()
            .map(|(name, license)| (name.to_lowercase(), license))
            .collect();
        Self { table }
    }

    /// Add or replace entries on top of the current table
    pub fn with_entries(mut self, entries: &IndexMap<String, String>) -> Self {
        for (name, license) in entries {
            self.table.insert(name.to_lowercase(), license.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl LicenseResolver for StaticLicenseResolver {
    fn resolve(&self, package: &str) -> Option<String> {
        self.table.get(&package.to_lowercase()).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Allowed,
    Blocked,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyLicense {
    pub package: String,
    pub license: String,
    pub status: DependencyStatus,
}

/// Resolution result for one manifest file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestCheck {
    pub manifest: PathBuf,
    pub format: ManifestFormat,
    pub packages: Vec<DependencyLicense>,
    pub has_blocked_packages: bool,
}

impl ManifestCheck {
    pub fn blocked(&self) -> impl Iterator<Item = &DependencyLicense> {
        self.packages.iter().filter(|p| p.status == DependencyStatus::Blocked)
    }
}

pub const UNKNOWN_LICENSE: &str = "Unknown";

/// Classify a resolved license against the catalog. Blocked wins over allowed.
pub fn classify(catalog: &RuleCatalog, license: Option<&str>) -> DependencyStatus {
    match license {
        Some(license) if catalog.is_blocked_license(license) => DependencyStatus::Blocked,
        Some(license) if catalog.is_allowed_license(license) => DependencyStatus::Allowed,
        _ => DependencyStatus::Unknown,
    }
}

/// Resolve every dependency declared in a manifest.
///
/// Returns the per-package classification plus the findings it implies:
/// one error per blocked package, and one warning per unknown package when
/// the catalog asks for it.
pub fn check_manifest(
    path: &Path,
    format: ManifestFormat,
    content: &str,
    catalog: &RuleCatalog,
    resolver: &dyn LicenseResolver,
) -> (ManifestCheck, Vec<Finding>) {
    let mut findings = Vec::new();
    let names = match format.parse(content) {
        Ok(names) => names,
        Err(e) => {
            findings.push(Finding::error(
                RULE_DEPENDENCY,
                format!("Could not read dependencies: {:#}", e),
                path,
            ));
            Vec::new()
        }
    };

    let mut packages = Vec::with_capacity(names.len());
    for name in names {
        let license = resolver.resolve(&name);
        let status = classify(catalog, license.as_deref());
        let license = license.unwrap_or_else(|| UNKNOWN_LICENSE.to_string());

        match status {
            DependencyStatus::Blocked => findings.push(Finding::error(
                RULE_DEPENDENCY,
                format!("Dependency '{}' uses blocked license '{}'", name, license),
                path,
            )),
            DependencyStatus::Unknown if catalog.unknown_dependency == MentionPolicy::Warn => {
                findings.push(Finding::warning(
                    RULE_DEPENDENCY,
                    format!("Dependency '{}' has unrecognised license '{}'", name, license),
                    path,
                ))
            }
            _ => {}
        }

        packages.push(DependencyLicense { package: name, license, status });
    }

    let has_blocked_packages = packages.iter().any(|p| p.status == DependencyStatus::Blocked);
    let check = ManifestCheck {
        manifest: path.to_path_buf(),
        format,
        packages,
        has_blocked_packages,
    };
    (check, findings)
}
