//! Reading credit request tables from delimited text.
//!
//! Every column is read as text so that the normalizers see exactly what the
//! file contains (`"16.0"`, `"$1,200.50"`, `"05/03/2021"`). The first column
//! becomes the row identifier and missing-value markers become nulls.

use crate::cleaner::sanitizers::mark_missing_values;
use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result, ResultExt};
use crate::table::RequestTable;
use crate::utils::DEFAULT_INDEX_NAME;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a credit request table from a file.
pub fn load_requests(path: impl AsRef<Path>, config: &CleaningConfig) -> Result<RequestTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::SourceNotFound(path.display().to_string()));
    }

    info!("Loading credit requests from: {}", path.display());
    let frame = read_options(config)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    into_request_table(frame, config)
}

/// Read a credit request table from in-memory delimited text.
pub fn read_requests(content: &str, config: &CleaningConfig) -> Result<RequestTable> {
    let cursor = Cursor::new(content.to_owned());
    let frame = read_options(config)
        .into_reader_with_file_handle(cursor)
        .finish()
        .context("Reading credit requests")?;

    into_request_table(frame, config)
}

fn read_options(config: &CleaningConfig) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(config.separator)
                .with_quote_char(Some(b'"')),
        )
}

fn into_request_table(mut frame: DataFrame, config: &CleaningConfig) -> Result<RequestTable> {
    let first = frame
        .get_column_names()
        .first()
        .map(|name| name.to_string())
        .ok_or_else(|| CleaningError::InvalidSource("source has no columns".to_string()))?;

    if is_unnamed_header(&first) {
        frame.rename(&first, DEFAULT_INDEX_NAME.into())?;
    }

    let table = RequestTable::new(frame)?;
    debug!(
        "Read {} rows x {} columns (index column '{}')",
        table.height(),
        table.width(),
        table.index_column()
    );

    let markers: HashSet<&str> = config.missing_markers.iter().map(String::as_str).collect();
    mark_missing_values(&table, &markers)
}

/// The CSV reader names an empty header field `column_1` when it is first.
fn is_unnamed_header(name: &str) -> bool {
    name.trim().is_empty() || name == "column_1"
}
