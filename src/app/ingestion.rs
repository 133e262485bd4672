// ==========================================
// Offshore Logistics - Ingestion Run
// ==========================================
// One run: every source batch of a raw dataset, assembled into a
// NormalizedDataset before metrics are published
// The run id is report metadata only; it never enters records
// ==========================================

use crate::domain::diagnostics::{Diagnostic, DiagnosticSummary};
use crate::domain::metric::MetricResult;
use crate::domain::records::NormalizedDataset;
use crate::domain::types::SourceType;
use crate::importer::NormalizedBatch;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Per-source outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source_type: SourceType,
    pub origin: Option<String>,
    pub summary: DiagnosticSummary,
}

#[derive(Debug, Clone)]
pub struct IngestionRun {
    pub run_id: String,
    pub started_at: NaiveDateTime,
    pub sources: Vec<SourceReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub dataset: NormalizedDataset,
}

/// JSON document printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub run_id: &'a str,
    pub started_at: NaiveDateTime,
    pub sources: &'a [SourceReport],
    pub diagnostics: &'a [Diagnostic],
    pub metrics: &'a [MetricResult],
}

impl IngestionRun {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now().naive_utc(),
            sources: Vec::new(),
            diagnostics: Vec::new(),
            dataset: NormalizedDataset::default(),
        }
    }

    /// Fold one normalized batch into the run.
    pub fn absorb(&mut self, batch: NormalizedBatch, origin: Option<String>) {
        self.sources.push(SourceReport {
            source_type: batch.entities.source_type(),
            origin,
            summary: batch.summary,
        });
        self.diagnostics.extend(batch.diagnostics);
        self.dataset.absorb(batch.entities);
    }

    pub fn total_rows(&self) -> usize {
        self.sources.iter().map(|s| s.summary.total_rows).sum()
    }

    pub fn critical_count(&self) -> usize {
        self.sources.iter().map(|s| s.summary.critical).sum()
    }

    pub fn report<'a>(&'a self, metrics: &'a [MetricResult]) -> RunReport<'a> {
        RunReport {
            run_id: &self.run_id,
            started_at: self.started_at,
            sources: &self.sources,
            diagnostics: &self.diagnostics,
            metrics,
        }
    }
}

impl Default for IngestionRun {
    fn default() -> Self {
        Self::new()
    }
}
