// ==========================================
// Offshore Logistics - Core Library
// ==========================================
// Reconciles offshore logistics spreadsheets (cost allocation,
// voyage events, manifests, bulk actions, rig schedule) into
// normalized records and derived operational metrics
// Reference catalog is loaded once and treated as immutable
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - types, catalog, records, diagnostics
pub mod domain;

// Engine layer - resolvers and classifier
pub mod engine;

// Import layer - raw rows to normalized records
pub mod importer;

// Metric layer - stateless derived metrics
pub mod metrics;

// Configuration - rules and catalog lookup
pub mod config;

// Logging
pub mod logging;

// Application layer - pipeline state and ingestion runs
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use app::{IngestionRun, OffshorePipeline, PipelineError};

pub use config::PipelineRules;

pub use domain::{
    Diagnostic, DiagnosticKind, DiagnosticLevel, MetricName, MetricResult, NormalizedDataset,
    NormalizedEntities, ReferenceCatalog, ScopeFilter, SourceType,
};

pub use engine::{LcClassifier, LocationResolution, LocationResolver, VesselResolution, VesselResolver};

pub use importer::{normalize, NormalizedBatch, RawRow};

pub use metrics::compute_metric;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "offshore-logistics";
