pub mod builtin_rules;
pub mod matcher;
pub mod rules;

// Re-export main types
pub use matcher::{CompiledCatalog, CompiledRule};
pub use rules::{LicenseRule, MentionPolicy, RuleCatalog, RuleCategory};
