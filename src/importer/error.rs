// ==========================================
// Offshore Logistics - Importer Error Types
// ==========================================
// Tool: thiserror derive
// Row-level problems are diagnostics, not errors; these variants
// cover file access and the per-field conversions that a
// normalizer turns into diagnostics
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== row / field =====
    #[error("required field missing (row {row}): {field}")]
    RequiredFieldMissing { row: usize, field: String },

    #[error("type conversion failed (row {row}, field {field}): {value}")]
    TypeConversionError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("unrecognised date (row {row}, field {field}): {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },
}

impl ImportError {
    /// Field the error refers to, for row-level errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ImportError::RequiredFieldMissing { field, .. }
            | ImportError::TypeConversionError { field, .. }
            | ImportError::DateFormatError { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Offending raw value, for conversion errors.
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            ImportError::TypeConversionError { value, .. }
            | ImportError::DateFormatError { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
