// ==========================================
// Offshore Logistics - Record Normalizer Trait
// ==========================================
// Scope: shared contract of the per-source normalizers
//   - NormalizeContext: catalog, rules and the resolvers built on it
//   - RowReader: typed field access that turns absent / malformed
//     cells into diagnostics instead of errors
//   - RecordNormalizer: raw row → entity, or ImportError to reject
// A normalizer never mutates shared state; the same row and
// catalog always give the same entity and diagnostics
// ==========================================

use crate::config::PipelineRules;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::diagnostics::{Diagnostic, DiagnosticKind};
use crate::domain::records::VesselIdentity;
use crate::domain::types::{SourceType, YearMonth};
use crate::engine::{LcClassifier, LocationResolution, LocationResolver, VesselResolver};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{CanonicalField, FieldExtractor, RawRow};
use chrono::NaiveDateTime;

// ==========================================
// NormalizeContext
// ==========================================
pub struct NormalizeContext<'a> {
    pub catalog: &'a ReferenceCatalog,
    pub rules: &'a PipelineRules,
    pub locations: LocationResolver<'a>,
    pub vessels: VesselResolver<'a>,
    pub classifier: LcClassifier<'a>,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(catalog: &'a ReferenceCatalog, rules: &'a PipelineRules) -> Self {
        Self {
            catalog,
            rules,
            locations: LocationResolver::new(catalog),
            vessels: VesselResolver::new(catalog),
            classifier: LcClassifier::new(catalog),
        }
    }
}

// ==========================================
// RowReader
// ==========================================
pub struct RowReader<'r> {
    row: &'r RawRow,
    row_number: usize,
    source_type: SourceType,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> RowReader<'r> {
    pub fn new(row: &'r RawRow, row_number: usize, source_type: SourceType) -> Self {
        Self {
            row,
            row_number,
            source_type,
            diagnostics: Vec::new(),
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn push(&mut self, kind: DiagnosticKind, field: Option<CanonicalField>, reason: impl Into<String>) {
        let mut diagnostic = Diagnostic::new(self.source_type, self.row_number, kind, reason);
        if let Some(f) = field {
            diagnostic = diagnostic.with_field(f.name());
        }
        self.diagnostics.push(diagnostic);
    }

    fn push_error(&mut self, kind: DiagnosticKind, err: &ImportError) {
        let mut diagnostic = Diagnostic::new(self.source_type, self.row_number, kind, err.to_string());
        if let Some(field) = err.field() {
            diagnostic = diagnostic.with_field(field);
        }
        if let Some(raw) = err.raw_value() {
            diagnostic = diagnostic.with_raw_value(raw);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Optional text; silent when absent.
    pub fn text(&self, field: CanonicalField) -> Option<String> {
        FieldExtractor.extract(self.row, field)
    }

    /// Expected text; absence is reported as FieldAbsent.
    pub fn expected(&mut self, field: CanonicalField) -> Option<String> {
        let value = self.text(field);
        if value.is_none() {
            self.push(
                DiagnosticKind::FieldAbsent,
                Some(field),
                format!("no value under any of: {}", field.aliases().join(", ")),
            );
        }
        value
    }

    /// Required text; absence rejects the row.
    pub fn required(&self, field: CanonicalField) -> ImportResult<String> {
        self.text(field).ok_or_else(|| ImportError::RequiredFieldMissing {
            row: self.row_number,
            field: field.name().to_string(),
        })
    }

    /// Number; a malformed cell becomes ValueParseFailure and None.
    pub fn number(&mut self, field: CanonicalField, expected: bool) -> Option<f64> {
        let raw = if expected { self.expected(field)? } else { self.text(field)? };
        match DataCleaner.number_field(self.row_number, field.name(), &raw) {
            Ok(v) => Some(v),
            Err(err) => {
                self.push_error(DiagnosticKind::ValueParseFailure, &err);
                None
            }
        }
    }

    /// Required number; absent or malformed rejects the row.
    pub fn required_number(&self, field: CanonicalField) -> ImportResult<f64> {
        let raw = self.required(field)?;
        DataCleaner.number_field(self.row_number, field.name(), &raw)
    }

    /// Timestamp; a malformed cell becomes DateParseFailure and None.
    pub fn datetime(&mut self, field: CanonicalField, expected: bool) -> Option<NaiveDateTime> {
        let raw = if expected { self.expected(field)? } else { self.text(field)? };
        match DataCleaner.datetime_field(self.row_number, field.name(), &raw) {
            Ok(v) => Some(v),
            Err(err) => {
                self.push_error(DiagnosticKind::DateParseFailure, &err);
                None
            }
        }
    }

    /// Month bucket; a malformed cell becomes DateParseFailure and None.
    pub fn month(&mut self, field: CanonicalField, expected: bool) -> Option<YearMonth> {
        let raw = if expected { self.expected(field)? } else { self.text(field)? };
        match DataCleaner.month_field(self.row_number, field.name(), &raw) {
            Ok(v) => Some(v),
            Err(err) => {
                self.push_error(DiagnosticKind::DateParseFailure, &err);
                None
            }
        }
    }

    /// Resolve free location text, reporting an unresolved reference.
    pub fn facility(
        &mut self,
        ctx: &NormalizeContext<'_>,
        field: CanonicalField,
        text: Option<&str>,
    ) -> Option<String> {
        let text = text?;
        match ctx.locations.resolve(text) {
            LocationResolution::Resolved { facility_id, .. } => Some(facility_id),
            LocationResolution::Unresolved { reason } => {
                let diagnostic = Diagnostic::new(
                    self.source_type,
                    self.row_number,
                    DiagnosticKind::UnresolvedLocation,
                    reason.to_string(),
                )
                .with_field(field.name())
                .with_raw_value(text);
                self.diagnostics.push(diagnostic);
                None
            }
        }
    }

    /// Resolve the vessel column; unknown names are retained as unresolved.
    pub fn vessel(&mut self, ctx: &NormalizeContext<'_>) -> Option<VesselIdentity> {
        let raw = self.expected(CanonicalField::Vessel)?;
        let identity = ctx.vessels.resolve_identity(&raw);
        if let VesselIdentity::Unresolved { raw_name } = &identity {
            let diagnostic = Diagnostic::new(
                self.source_type,
                self.row_number,
                DiagnosticKind::UnresolvedVessel,
                "vessel not in catalog, kept as third-party/unknown",
            )
            .with_field(CanonicalField::Vessel.name())
            .with_raw_value(raw_name.clone());
            self.diagnostics.push(diagnostic);
        }
        Some(identity)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ==========================================
// RecordNormalizer
// ==========================================
pub trait RecordNormalizer {
    type Record;

    fn source_type(&self) -> SourceType;

    /// Normalize one row. `Err` rejects the row; non-fatal findings go to `reader`.
    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<Self::Record>;
}
