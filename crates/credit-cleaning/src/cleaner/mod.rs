//! Cleaning operations for credit request tables.
//!
//! This module provides:
//! - Row filters: dropping incomplete rows and exact duplicates
//! - Text normalizers for labels, free text and neighborhood names
//! - Type conversions for districts, currency amounts and dates
//!
//! Every operation borrows a [`RequestTable`] and returns a new one.

mod converters;
pub(crate) mod sanitizers;
mod text;

pub use converters::{
    currency_to_int, expand_short_year, normalize_benefit_date, normalize_currency,
    normalize_district, parse_day_first, truncate_to_int,
};
pub use text::{
    free_text, lowercase_label, neighborhood_text, normalize_categorical, normalize_free_text,
    normalize_neighborhood,
};

use crate::error::Result;
use crate::table::RequestTable;
use polars::prelude::*;
use tracing::{debug, warn};

/// Keep only rows with a value in every field column.
///
/// The row identifier is not a field and is not checked. Row order is kept.
pub fn drop_incomplete_rows(table: &RequestTable) -> Result<RequestTable> {
    let fields = table.field_names();
    let before = table.height();
    let frame = table.frame().drop_nulls(Some(fields.as_slice()))?;

    let removed = before - frame.height();
    if removed > 0 {
        warn!("Removed {} rows with missing values", removed);
    } else {
        debug!("No rows with missing values found");
    }

    Ok(table.derive(frame))
}

/// Remove rows equal to an earlier row across all field columns.
///
/// The first occurrence is kept and row order is preserved. Rows that differ
/// only in their identifier count as duplicates.
pub fn drop_duplicate_rows(table: &RequestTable) -> Result<RequestTable> {
    let fields = table.field_names();
    let before = table.height();
    let frame = if fields.is_empty() {
        table.frame().clone()
    } else {
        table
            .frame()
            .unique_stable(Some(fields.as_slice()), UniqueKeepStrategy::First, None)?
    };

    let removed = before - frame.height();
    if removed > 0 {
        warn!("Removed {} duplicate rows", removed);
    } else {
        debug!("No duplicate rows found");
    }

    Ok(table.derive(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_values(table: &RequestTable) -> Vec<String> {
        let series = table
            .frame()
            .column(table.index_column())
            .unwrap()
            .as_materialized_series();
        series
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_drop_incomplete_rows_keeps_order() {
        let frame = df!(
            "row_id" => &["a", "b", "c", "d"],
            "sexo" => &[Some("Mujer"), Some("Hombre"), None, Some("Mujer")],
            "comuna_ciudadano" => &[Some("16.0"), None, Some("4.0"), Some("8.0")]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap();
        let cleaned = drop_incomplete_rows(&raw).unwrap();

        assert_eq!(index_values(&cleaned), vec!["a", "d"]);
        assert_eq!(raw.height(), 4);
    }

    #[test]
    fn test_drop_incomplete_rows_ignores_index() {
        let frame = df!(
            "row_id" => &[None, Some("b")],
            "sexo" => &["Mujer", "Hombre"]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap();
        let cleaned = drop_incomplete_rows(&raw).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_drop_duplicate_rows_keeps_first() {
        let frame = df!(
            "row_id" => &["a", "b", "c", "d"],
            "sexo" => &["mujer", "hombre", "mujer", "mujer"],
            "monto" => &[1200i64, 900, 1200, 1300]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap();
        let cleaned = drop_duplicate_rows(&raw).unwrap();

        assert_eq!(index_values(&cleaned), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_drop_duplicate_rows_preserves_tags() {
        let frame = df!(
            "row_id" => &["a", "b"],
            "sexo" => &["mujer", "mujer"]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap().tagged_categorical("sexo");
        let cleaned = drop_duplicate_rows(&raw).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert!(cleaned.is_categorical("sexo"));
    }
}
