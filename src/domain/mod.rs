// ==========================================
// Offshore Logistics - Domain Layer
// ==========================================
// Scope: reference data, normalized entities, diagnostics and
// metric result types
// No resolution logic and no I/O here
// ==========================================

pub mod catalog;
pub mod diagnostics;
pub mod metric;
pub mod records;
pub mod types;

pub use catalog::{
    normalize_lc_code, CatalogDocument, CatalogError, CatalogIntegrityDefect, Facility,
    ReferenceCatalog, Vessel,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, DiagnosticSummary};
pub use metric::{MetricBucket, MetricName, MetricResult, MetricScope, ScopeFilter};
pub use records::{
    BulkActionRecord, CostAllocationRecord, FacilitySource, ManifestRecord, NormalizedDataset,
    NormalizedEntities, RigScheduleRecord, VesselIdentity, VoyageEventRecord,
};
pub use types::{
    ClassificationBasis, CostClassification, FacilityType, FluidCategory, LcClassification,
    SourceType, TimeClass, TransferDirection, VesselClass, YearMonth,
};
