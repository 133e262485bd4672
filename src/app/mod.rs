// ==========================================
// Offshore Logistics - Application Layer
// ==========================================
// Scope: pipeline state (catalog + rules) and ingestion runs
// ==========================================

pub mod ingestion;
pub mod state;

pub use ingestion::{IngestionRun, RunReport, SourceReport};
pub use state::{OffshorePipeline, PipelineError};
