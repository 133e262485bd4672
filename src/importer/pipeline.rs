// ==========================================
// Offshore Logistics - Normalize Dispatcher
// ==========================================
// Flow per batch:
//   1. every row through its source normalizer (row-level
//      failures become RowRejected diagnostics, never abort)
//   2. keep-last de-duplication by business key (if enabled)
//   3. summary over the collected diagnostics
// Row numbers are 1-based positions in the raw collection
// ==========================================

use crate::domain::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSummary};
use crate::domain::records::NormalizedEntities;
use crate::domain::types::SourceType;
use crate::importer::bulk_action::BulkActionNormalizer;
use crate::importer::conflict_handler::{BusinessKeyed, ConflictHandler};
use crate::importer::cost_allocation::CostAllocationNormalizer;
use crate::importer::field_mapper::RawRow;
use crate::importer::manifest::ManifestNormalizer;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};
use crate::importer::rig_schedule::RigScheduleNormalizer;
use crate::importer::voyage_event::VoyageEventNormalizer;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Result of one `normalize` call.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedBatch {
    pub entities: NormalizedEntities,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: DiagnosticSummary,
}

/// Normalize one raw collection of the given source type.
#[instrument(skip_all, fields(source = %source_type, rows = rows.len()))]
pub fn normalize(rows: &[RawRow], source_type: SourceType, ctx: &NormalizeContext<'_>) -> NormalizedBatch {
    info!("normalize batch start");

    let (entities, diagnostics) = match source_type {
        SourceType::CostAllocation => {
            let (records, diags) = run_normalizer(&CostAllocationNormalizer, rows, ctx);
            (NormalizedEntities::CostAllocation(records), diags)
        }
        SourceType::VoyageEvent => {
            let (records, diags) = run_normalizer(&VoyageEventNormalizer, rows, ctx);
            (NormalizedEntities::VoyageEvent(records), diags)
        }
        SourceType::Manifest => {
            let (records, diags) = run_normalizer(&ManifestNormalizer, rows, ctx);
            (NormalizedEntities::Manifest(records), diags)
        }
        SourceType::BulkAction => {
            let (records, diags) = run_normalizer(&BulkActionNormalizer, rows, ctx);
            (NormalizedEntities::BulkAction(records), diags)
        }
        SourceType::RigSchedule => {
            let (records, diags) = run_normalizer(&RigScheduleNormalizer, rows, ctx);
            (NormalizedEntities::RigSchedule(records), diags)
        }
    };

    let summary = DiagnosticSummary::from_diagnostics(rows.len(), entities.len(), &diagnostics);
    info!(
        total = summary.total_rows,
        normalized = summary.normalized,
        rejected = summary.rejected,
        duplicates = summary.duplicates_dropped,
        critical = summary.critical,
        "normalize batch finished"
    );

    NormalizedBatch {
        entities,
        diagnostics,
        summary,
    }
}

/// Row loop + de-duplication for one normalizer.
pub fn run_normalizer<N>(
    normalizer: &N,
    rows: &[RawRow],
    ctx: &NormalizeContext<'_>,
) -> (Vec<N::Record>, Vec<Diagnostic>)
where
    N: RecordNormalizer,
    N::Record: BusinessKeyed,
{
    let source_type = normalizer.source_type();
    let mut records = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let mut reader = RowReader::new(row, idx + 1, source_type);
        let result = normalizer.normalize_row(&mut reader, ctx);
        diagnostics.extend(reader.into_diagnostics());

        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(row = idx + 1, error = %err, "row rejected");
                let mut diagnostic =
                    Diagnostic::new(source_type, idx + 1, DiagnosticKind::RowRejected, err.to_string());
                if let Some(field) = err.field() {
                    diagnostic = diagnostic.with_field(field);
                }
                if let Some(raw) = err.raw_value() {
                    diagnostic = diagnostic.with_raw_value(raw);
                }
                diagnostics.push(diagnostic);
            }
        }
    }

    if !ctx.rules.deduplicate {
        return (records, diagnostics);
    }

    let (kept, superseded) = ConflictHandler.keep_last(records);
    for s in superseded {
        debug!(row = s.row_number, kept_row = s.kept_row, key = %s.key, "duplicate dropped");
        diagnostics.push(
            Diagnostic::new(
                source_type,
                s.row_number,
                DiagnosticKind::DuplicateRow,
                format!("superseded by row {} (keep last)", s.kept_row),
            )
            .with_raw_value(s.key),
        );
    }
    (kept, diagnostics)
}
