// ==========================================
// Offshore Logistics - Diagnostics
// ==========================================
// Scope: row-level findings collected alongside normalized records
// Invariant: a row-level failure never aborts a batch; it becomes
// one Diagnostic carrying source row, field and reason
// ==========================================

use crate::domain::types::SourceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// DiagnosticLevel
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticLevel {
    Info,
    Warning,
    /// Reference-data integrity defects and rejected rows
    Critical,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "INFO"),
            DiagnosticLevel::Warning => write!(f, "WARNING"),
            DiagnosticLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// DiagnosticKind
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    FieldAbsent,
    UnresolvedLocation,
    UnresolvedVessel,
    AmbiguousLcClassification,
    ClassificationFallback,
    DateParseFailure,
    ValueParseFailure,
    /// Location text and LC ownership point at different facilities
    LocationConflict,
    DuplicateRow,
    /// Required field missing; no record emitted for the row
    RowRejected,
}

impl DiagnosticKind {
    pub fn default_level(&self) -> DiagnosticLevel {
        match self {
            DiagnosticKind::FieldAbsent
            | DiagnosticKind::ClassificationFallback
            | DiagnosticKind::DuplicateRow => DiagnosticLevel::Info,
            DiagnosticKind::UnresolvedLocation
            | DiagnosticKind::UnresolvedVessel
            | DiagnosticKind::DateParseFailure
            | DiagnosticKind::ValueParseFailure
            | DiagnosticKind::LocationConflict => DiagnosticLevel::Warning,
            DiagnosticKind::AmbiguousLcClassification | DiagnosticKind::RowRejected => {
                DiagnosticLevel::Critical
            }
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::FieldAbsent => "FIELD_ABSENT",
            DiagnosticKind::UnresolvedLocation => "UNRESOLVED_LOCATION",
            DiagnosticKind::UnresolvedVessel => "UNRESOLVED_VESSEL",
            DiagnosticKind::AmbiguousLcClassification => "AMBIGUOUS_LC_CLASSIFICATION",
            DiagnosticKind::ClassificationFallback => "CLASSIFICATION_FALLBACK",
            DiagnosticKind::DateParseFailure => "DATE_PARSE_FAILURE",
            DiagnosticKind::ValueParseFailure => "VALUE_PARSE_FAILURE",
            DiagnosticKind::LocationConflict => "LOCATION_CONFLICT",
            DiagnosticKind::DuplicateRow => "DUPLICATE_ROW",
            DiagnosticKind::RowRejected => "ROW_REJECTED",
        };
        write!(f, "{}", label)
    }
}

// ==========================================
// Diagnostic
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source_type: SourceType,
    pub row_number: usize, // 1-based data row in source order
    pub field: Option<String>,
    pub kind: DiagnosticKind,
    pub level: DiagnosticLevel,
    pub reason: String,
    pub raw_value: Option<String>,
}

impl Diagnostic {
    pub fn new(
        source_type: SourceType,
        row_number: usize,
        kind: DiagnosticKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            row_number,
            field: None,
            kind,
            level: kind.default_level(),
            reason: reason.into(),
            raw_value: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_raw_value(mut self, raw: impl Into<String>) -> Self {
        self.raw_value = Some(raw.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} row {}",
            self.level, self.source_type, self.row_number
        )?;
        if let Some(field) = &self.field {
            write!(f, " field {}", field)?;
        }
        write!(f, ": {} - {}", self.kind, self.reason)
    }
}

// ==========================================
// DiagnosticSummary
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    pub total_rows: usize,
    pub normalized: usize,
    pub rejected: usize,
    pub duplicates_dropped: usize,
    pub info: usize,
    pub warning: usize,
    pub critical: usize,
    pub by_kind: BTreeMap<DiagnosticKind, usize>,
}

impl DiagnosticSummary {
    pub fn from_diagnostics(
        total_rows: usize,
        normalized: usize,
        diagnostics: &[Diagnostic],
    ) -> Self {
        let mut summary = DiagnosticSummary {
            total_rows,
            normalized,
            ..Default::default()
        };
        for d in diagnostics {
            match d.level {
                DiagnosticLevel::Info => summary.info += 1,
                DiagnosticLevel::Warning => summary.warning += 1,
                DiagnosticLevel::Critical => summary.critical += 1,
            }
            match d.kind {
                DiagnosticKind::RowRejected => summary.rejected += 1,
                DiagnosticKind::DuplicateRow => summary.duplicates_dropped += 1,
                _ => {}
            }
            *summary.by_kind.entry(d.kind).or_insert(0) += 1;
        }
        summary
    }
}
