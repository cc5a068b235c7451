//! Shared utilities for the cleaning pipeline.
//!
//! Column access helpers used by every normalizer, plus the constants that
//! describe the source format.

use crate::error::{CleaningError, Result};
use polars::prelude::*;

// =============================================================================
// Source Format Constants
// =============================================================================

/// Cell texts that tabular readers conventionally treat as missing.
pub const DEFAULT_MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Name given to the row-identifier column when the source header leaves it blank.
pub const DEFAULT_INDEX_NAME: &str = "row_id";

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// Column Access Utilities
// =============================================================================

/// Look up a column as a materialized series, mapping absence to
/// [`CleaningError::ColumnNotFound`].
pub fn series<'a>(frame: &'a DataFrame, column: &str) -> Result<&'a Series> {
    frame
        .column(column)
        .map(|col| col.as_materialized_series())
        .map_err(|_| CleaningError::ColumnNotFound(column.to_string()))
}

/// Borrow a column's text values.
///
/// Fails with [`CleaningError::TypeConversionFailed`] when the column holds
/// anything other than text; `target_type` names what the caller was trying
/// to produce.
pub fn text_values<'a>(
    frame: &'a DataFrame,
    column: &str,
    target_type: &str,
) -> Result<&'a StringChunked> {
    let series = series(frame, column)?;
    if series.dtype() != &DataType::String {
        return Err(CleaningError::TypeConversionFailed {
            column: column.to_string(),
            target_type: target_type.to_string(),
            reason: format!("expected text values, found {:?}", series.dtype()),
        });
    }
    Ok(series.str()?)
}

/// Map every non-null text value of a column, keeping nulls in place.
pub fn map_text_values<F>(values: &StringChunked, mut f: F) -> Vec<Option<String>>
where
    F: FnMut(&str) -> String,
{
    values.into_iter().map(|opt| opt.map(&mut f)).collect()
}

// =============================================================================
// Tests
// =============================================================================
