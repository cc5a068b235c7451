//! Missing-value marker handling applied when a table is loaded.

use crate::error::Result;
use crate::table::RequestTable;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Turn every field cell whose exact text is a missing marker into a null.
///
/// The row-identifier column and non-text columns are left alone. Matching
/// is exact: no trimming and no case folding, so `" NA"` stays a value.
pub(crate) fn mark_missing_values(
    table: &RequestTable,
    markers: &HashSet<&str>,
) -> Result<RequestTable> {
    let mut frame = table.frame().clone();
    let mut total_replacements = 0;

    for col_name in table.field_names() {
        let series = frame.column(&col_name)?.as_materialized_series();
        if series.dtype() != &DataType::String {
            continue;
        }

        let (cleaned_series, count) = replace_markers_with_null(series, markers)?;
        if count > 0 {
            total_replacements += count;
            frame.replace(&col_name, cleaned_series)?;
        }
    }

    if total_replacements > 0 {
        debug!(
            "Replaced {} missing-value markers with null",
            total_replacements
        );
    }

    Ok(table.derive(frame))
}

/// Replace marker texts in a single text series with nulls.
pub(crate) fn replace_markers_with_null(
    series: &Series,
    markers: &HashSet<&str>,
) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut cleaned_values = Vec::with_capacity(str_series.len());
    let mut replacement_count = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if markers.contains(val) => {
                cleaned_values.push(None);
                replacement_count += 1;
            }
            other => cleaned_values.push(other),
        }
    }

    Ok((
        Series::new(series.name().clone(), cleaned_values),
        replacement_count,
    ))
}
