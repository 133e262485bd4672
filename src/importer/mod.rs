// ==========================================
// Offshore Logistics - Importer
// ==========================================
// Scope: raw tabular rows → normalized entities + diagnostics
// Sources: cost allocation, voyage events, manifests, bulk
// actions, rig schedule (CSV / Excel via file_parser)
// ==========================================

pub mod bulk_action;
pub mod conflict_handler;
pub mod cost_allocation;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod manifest;
pub mod normalizer;
pub mod pipeline;
pub mod rig_schedule;
pub mod voyage_event;

pub use bulk_action::{categorize_fluid, BulkActionNormalizer};
pub use conflict_handler::{BusinessKeyed, ConflictHandler, SupersededRow};
pub use cost_allocation::CostAllocationNormalizer;
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{is_absent_value, CanonicalField, FieldExtractor, RawRow};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use manifest::ManifestNormalizer;
pub use normalizer::{NormalizeContext, RecordNormalizer, RowReader};
pub use pipeline::{normalize, NormalizedBatch};
pub use rig_schedule::RigScheduleNormalizer;
pub use voyage_event::{classify_time, VoyageEventNormalizer};
