// ==========================================
// Offshore Logistics - Pipeline State
// ==========================================
// Owns the reference catalog and rules for the process lifetime
// Both are immutable behind Arc; a catalog update builds a new
// OffshorePipeline instead of mutating this one
// ==========================================

use crate::config::{load_catalog, load_rules, PipelineRules, RulesError};
use crate::domain::catalog::{CatalogError, ReferenceCatalog};
use crate::domain::metric::{MetricName, MetricResult, ScopeFilter};
use crate::domain::records::NormalizedDataset;
use crate::domain::types::{LcClassification, SourceType};
use crate::engine::{LcClassifier, LocationResolution, LocationResolver, VesselResolution, VesselResolver};
use crate::importer::{normalize, ImportError, NormalizeContext, NormalizedBatch, RawRow, UniversalFileParser};
use crate::metrics::{compute_metric, MetricContext};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fatal: nothing can be classified without reference data
    #[error("catalog load failure: {0}")]
    CatalogLoadFailure(#[from] CatalogError),

    #[error("rules load failure: {0}")]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Shared entry point for normalization, classification and metrics.
#[derive(Clone)]
pub struct OffshorePipeline {
    catalog: Arc<ReferenceCatalog>,
    rules: Arc<PipelineRules>,
}

impl OffshorePipeline {
    pub fn new(catalog: ReferenceCatalog, rules: PipelineRules) -> Self {
        Self {
            catalog: Arc::new(catalog),
            rules: Arc::new(rules),
        }
    }

    /// Built-in catalog with default rules.
    pub fn with_builtin_catalog() -> Result<Self, PipelineError> {
        Ok(Self::new(ReferenceCatalog::builtin()?, PipelineRules::default()))
    }

    /// Catalog and rules through the configured lookup order.
    pub fn from_config(
        catalog_path: Option<&Path>,
        rules_path: Option<&Path>,
    ) -> Result<Self, PipelineError> {
        let catalog = load_catalog(catalog_path)?;
        let rules = load_rules(rules_path)?;
        info!(
            facilities = catalog.facilities().len(),
            vessels = catalog.vessels().len(),
            integrity_defects = catalog.integrity_defects().len(),
            "pipeline initialised"
        );
        Ok(Self::new(catalog, rules))
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &PipelineRules {
        &self.rules
    }

    // ==========================================
    // Normalization
    // ==========================================

    pub fn normalize(&self, rows: &[RawRow], source_type: SourceType) -> NormalizedBatch {
        let ctx = NormalizeContext::new(&self.catalog, &self.rules);
        normalize(rows, source_type, &ctx)
    }

    /// Parse a CSV/XLSX file and normalize its rows.
    pub fn normalize_file(
        &self,
        path: &Path,
        source_type: SourceType,
    ) -> Result<NormalizedBatch, PipelineError> {
        let rows = UniversalFileParser.parse(path)?;
        info!(path = %path.display(), rows = rows.len(), "file parsed");
        Ok(self.normalize(&rows, source_type))
    }

    // ==========================================
    // Metrics
    // ==========================================

    pub fn compute_metric(
        &self,
        name: MetricName,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
    ) -> MetricResult {
        let ctx = MetricContext::new(&self.catalog, &self.rules);
        compute_metric(name, dataset, filter, &ctx)
    }

    pub fn compute_all(&self, dataset: &NormalizedDataset, filter: &ScopeFilter) -> Vec<MetricResult> {
        MetricName::ALL
            .iter()
            .map(|&name| self.compute_metric(name, dataset, filter))
            .collect()
    }

    // ==========================================
    // Classification functions for external reuse
    // ==========================================

    pub fn classify_lc(&self, lc: &str, facility_id: &str) -> LcClassification {
        LcClassifier::new(&self.catalog).classify(lc, facility_id)
    }

    pub fn resolve_facility(&self, text: &str) -> LocationResolution {
        LocationResolver::new(&self.catalog).resolve(text)
    }

    pub fn resolve_vessel(&self, name: &str) -> VesselResolution {
        VesselResolver::new(&self.catalog).resolve(name)
    }
}
