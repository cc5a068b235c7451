//! Text normalizers: categorical labels, free text and neighborhood names.

use crate::error::Result;
use crate::table::RequestTable;
use crate::utils::{map_text_values, text_values};
use polars::prelude::*;
use tracing::debug;

/// Lowercase a label. Nothing else changes.
pub fn lowercase_label(value: &str) -> String {
    value.to_lowercase()
}

/// Lowercase and turn every hyphen and underscore into a space, keeping any
/// surrounding whitespace.
pub fn neighborhood_text(value: &str) -> String {
    value.to_lowercase().replace(['-', '_'], " ")
}

/// Lowercase, turn every hyphen and underscore into a space, then trim.
pub fn free_text(value: &str) -> String {
    neighborhood_text(value).trim().to_string()
}

/// Lowercase a label column and tag it categorical.
///
/// The category set is whatever distinct lowercase values occur.
pub fn normalize_categorical(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let values = text_values(table.frame(), column, "categorical")?;
    let cleaned = map_text_values(values, lowercase_label);
    let normalized = table
        .with_replaced_column(Series::new(column.into(), cleaned))?
        .tagged_categorical(column);

    debug!(
        "Normalized '{}' into {} categories",
        column,
        normalized.categories(column).map_or(0, |c| c.len())
    );
    Ok(normalized)
}

/// Apply [`free_text`] to every value of a column.
pub fn normalize_free_text(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let values = text_values(table.frame(), column, "free text")?;
    let cleaned = map_text_values(values, free_text);
    debug!("Normalized free text in '{}'", column);
    table.with_replaced_column(Series::new(column.into(), cleaned))
}

/// Apply [`neighborhood_text`] to every value of a column.
///
/// Unlike [`normalize_free_text`] lateral whitespace is kept: downstream
/// consumers match neighborhood names including their padding.
pub fn normalize_neighborhood(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let values = text_values(table.frame(), column, "neighborhood text")?;
    let cleaned = map_text_values(values, neighborhood_text);
    debug!("Normalized neighborhood names in '{}'", column);
    table.with_replaced_column(Series::new(column.into(), cleaned))
}
