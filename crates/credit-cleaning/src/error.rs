//! Error types for the credit request cleaning pipeline.
//!
//! Every failure aborts the whole cleaning run: no partially cleaned table is
//! ever handed back to the caller. Missing values and duplicate rows are not
//! errors, they are resolved by dropping rows.
//!
//! Errors are serializable so a caller can forward them as
//! `{ "code": ..., "message": ... }` payloads.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The source file does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// The source was read but cannot be used as a request table.
    #[error("Invalid source table: {0}")]
    InvalidSource(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A value could not be coerced to the column's target type.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// A date value matched none of the accepted formats.
    ///
    /// `row` is the position in the table being converted; `id` is the
    /// source row identifier, which locates the row in the input file.
    #[error("Failed to parse date in column '{column}' at row {row} (id '{id}'): '{value}'")]
    DateParseFailed {
        column: String,
        row: usize,
        id: String,
        value: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, unaffected by added context.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::InvalidSource(_) => "INVALID_SOURCE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::DateParseFailed { .. } => "DATE_PARSE_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Returns the innermost error, skipping any context layers.
    pub fn root_cause(&self) -> &CleaningError {
        match self {
            Self::WithContext { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
