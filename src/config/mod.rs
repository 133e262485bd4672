// ==========================================
// Offshore Logistics - Configuration
// ==========================================
// Scope: pipeline rules (JSON, serde defaults) and the
// catalog/rules file lookup
// ==========================================

pub mod catalog_loader;
pub mod pipeline_rules;

pub use catalog_loader::{
    default_config_dir, load_catalog, load_catalog_file, load_rules, CATALOG_ENV_VAR,
    RULES_ENV_VAR,
};
pub use pipeline_rules::{PipelineRules, RulesError};
