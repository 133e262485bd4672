// ==========================================
// Offshore Logistics - Catalog / Rules Loader
// ==========================================
// Scope: locate and load the reference catalog and pipeline rules
// Lookup order:
//   1. explicit path (CLI argument)
//   2. OFFSHORE_LOGISTICS_CATALOG / OFFSHORE_LOGISTICS_RULES
//   3. <config_dir>/offshore-logistics/{catalog,rules}.json
//   4. built-in catalog / default rules
// A file that is named but missing is an error; only an absent
// default location falls through to the built-in data
// ==========================================

use crate::config::pipeline_rules::{PipelineRules, RulesError};
use crate::domain::catalog::{CatalogError, ReferenceCatalog};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CATALOG_ENV_VAR: &str = "OFFSHORE_LOGISTICS_CATALOG";
pub const RULES_ENV_VAR: &str = "OFFSHORE_LOGISTICS_RULES";
const APP_CONFIG_DIR: &str = "offshore-logistics";
const CATALOG_FILE_NAME: &str = "catalog.json";
const RULES_FILE_NAME: &str = "rules.json";

/// `<config_dir>/offshore-logistics`, when the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR))
}

pub fn default_catalog_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(CATALOG_FILE_NAME))
}

pub fn default_rules_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(RULES_FILE_NAME))
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load a catalog JSON document from `path`.
pub fn load_catalog_file(path: &Path) -> Result<ReferenceCatalog, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let catalog = ReferenceCatalog::from_json_str(&content)?;
    info!(path = %path.display(), "catalog loaded from file");
    Ok(catalog)
}

/// Resolve the catalog through the lookup order above.
pub fn load_catalog(explicit: Option<&Path>) -> Result<ReferenceCatalog, CatalogError> {
    if let Some(path) = explicit {
        return load_catalog_file(path);
    }
    if let Some(path) = env_path(CATALOG_ENV_VAR) {
        return load_catalog_file(&path);
    }
    if let Some(path) = default_catalog_path().filter(|p| p.exists()) {
        return load_catalog_file(&path);
    }
    info!("no catalog file configured, using built-in catalog");
    ReferenceCatalog::builtin()
}

/// Resolve the pipeline rules through the lookup order above.
pub fn load_rules(explicit: Option<&Path>) -> Result<PipelineRules, RulesError> {
    if let Some(path) = explicit {
        return PipelineRules::load(path);
    }
    if let Some(path) = env_path(RULES_ENV_VAR) {
        return PipelineRules::load(&path);
    }
    if let Some(path) = default_rules_path().filter(|p| p.exists()) {
        return PipelineRules::load(&path);
    }
    Ok(PipelineRules::default())
}
