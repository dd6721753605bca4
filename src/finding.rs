use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Finding severity. Only errors block a commit or build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

pub const RULE_MISSING_HEADER: &str = "missing-header";
pub const RULE_COMMERCIAL: &str = "commercial-restriction";
pub const RULE_DEPENDENCY: &str = "dependency-license";
pub const RULE_FILE_ACCESS: &str = "file-access";

/// Rule id for a blocked license family, e.g. `blocked-license/GPL`
pub fn blocked_rule_id(family: &str) -> String {
    format!("blocked-license/{}", family)
}

/// A single detected issue in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub rule_id: String,
    pub message: String,
    pub file: PathBuf,
}

impl Finding {
    pub fn error(rule_id: impl Into<String>, message: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            severity: Severity::Error,
            rule_id: rule_id.into(),
            message: message.into(),
            file: file.into(),
        }
    }

    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            severity: Severity::Warning,
            rule_id: rule_id.into(),
            message: message.into(),
            file: file.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
