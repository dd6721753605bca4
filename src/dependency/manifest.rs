use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Package-manager format of a dependency manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestFormat {
    /// pip `requirements.txt`: one `name==version` line per dependency
    Requirements,
    /// npm `package.json`: dependency maps keyed by package name
    PackageJson,
}

impl ManifestFormat {
    pub fn detect(file_name: &str) -> Option<Self> {
        if file_name == "package.json" {
            Some(Self::PackageJson)
        } else if file_name.ends_with(".txt") && file_name.contains("requirements") {
            Some(Self::Requirements)
        } else {
            None
        }
    }

    /// Extract declared package names, in declaration order
    pub fn parse(self, content: &str) -> Result<Vec<String>> {
        match self {
            Self::Requirements => Ok(parse_requirements(content)),
            Self::PackageJson => parse_package_json(content),
        }
    }
}

const PACKAGE_JSON_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(requirement_name)
        .collect()
}

/// Bare package name from one requirements line.
///
/// `requests==2.31.0`, `requests>=2.0`, `requests[socks]; python_version>"3"`
/// and plain `requests` all yield `requests`.
pub fn requirement_name(line: &str) -> Option<String> {
    let line = line.split(" #").next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }

    let line = line.split(';').next().unwrap_or("").trim();
    let end = line
        .find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | '[' | '@' | ' ' | '\t'))
        .unwrap_or(line.len());
    let name = line[..end].trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn parse_package_json(content: &str) -> Result<Vec<String>> {
    let manifest: Value = serde_json::from_str(content).context("Failed to parse package.json")?;

    let mut names = Vec::new();
    for section in PACKAGE_JSON_SECTIONS {
        if let Some(deps) = manifest.get(section).and_then(Value::as_object) {
            for name in deps.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
    }
    Ok(names)
}
