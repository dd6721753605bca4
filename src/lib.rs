pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod dependency;
pub mod finding;
pub mod init;
pub mod output;
pub mod report;
pub mod scanner;
pub mod selector;

// Re-export main types for easy access
pub use catalog::{CompiledCatalog, LicenseRule, MentionPolicy, RuleCatalog, RuleCategory};
pub use dependency::{LicenseResolver, StaticLicenseResolver};
pub use finding::{Finding, Severity};
pub use report::{OverallStatus, ScanResult, Summary};
pub use scanner::{write_snapshot, Scanner};
pub use selector::{GitStagedFiles, SelectionMode, StagedFiles, StaticStagedFiles};
