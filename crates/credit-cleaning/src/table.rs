//! The in-memory credit request table.
//!
//! A [`RequestTable`] pairs a polars [`DataFrame`] with two pieces of
//! metadata: which column is the row identifier carried from the source file,
//! and which columns have been tagged categorical. Tables are values: every
//! cleaning operation borrows one and returns a new one, so earlier stages
//! stay available to the caller.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::collections::BTreeSet;

/// An ordered table of credit requests indexed by an opaque row identifier.
#[derive(Debug, Clone)]
pub struct RequestTable {
    frame: DataFrame,
    index_column: String,
    categorical: BTreeSet<String>,
}

static_assertions::assert_impl_all!(RequestTable: Send, Sync);

impl RequestTable {
    /// Wrap a frame, using its first column as the row identifier.
    pub fn new(frame: DataFrame) -> Result<Self> {
        let index_column = frame
            .get_column_names()
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| {
                CleaningError::InvalidSource("table has no columns".to_string())
            })?;
        Self::with_index(frame, index_column)
    }

    /// Wrap a frame with an explicitly named row-identifier column.
    pub fn with_index(frame: DataFrame, index_column: impl Into<String>) -> Result<Self> {
        let index_column = index_column.into();
        if frame.column(&index_column).is_err() {
            return Err(CleaningError::ColumnNotFound(index_column));
        }
        Ok(Self {
            frame,
            index_column,
            categorical: BTreeSet::new(),
        })
    }

    /// The underlying frame, identifier column included.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table and return its frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Name of the row-identifier column.
    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    /// Names of every column except the row identifier.
    pub fn field_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != self.index_column)
            .map(|name| name.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Whether a column has been tagged as holding a small, finite set of values.
    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.contains(column)
    }

    /// Columns currently tagged categorical, in name order.
    pub fn categorical_columns(&self) -> impl Iterator<Item = &str> {
        self.categorical.iter().map(String::as_str)
    }

    /// Distinct non-null values of a categorical text column, sorted.
    ///
    /// Returns `None` for columns that are not tagged or not text.
    pub fn categories(&self, column: &str) -> Option<BTreeSet<String>> {
        if !self.is_categorical(column) {
            return None;
        }
        let series = self.frame.column(column).ok()?.as_materialized_series();
        let values = series.str().ok()?;
        Some(values.into_iter().flatten().map(str::to_string).collect())
    }

    /// A new table sharing this table's metadata around a different frame.
    pub(crate) fn derive(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            index_column: self.index_column.clone(),
            categorical: self.categorical.clone(),
        }
    }

    /// A new table with one column replaced.
    ///
    /// The replaced column loses any categorical tag; callers that produce a
    /// categorical column re-tag it with [`RequestTable::tagged_categorical`].
    pub(crate) fn with_replaced_column(&self, series: Series) -> Result<Self> {
        let name = series.name().to_string();
        if self.frame.column(&name).is_err() {
            return Err(CleaningError::ColumnNotFound(name));
        }
        let mut frame = self.frame.clone();
        frame.replace(&name, series)?;

        let mut table = self.derive(frame);
        table.categorical.remove(&name);
        Ok(table)
    }

    /// Tag a column categorical.
    pub(crate) fn tagged_categorical(mut self, column: &str) -> Self {
        self.categorical.insert(column.to_string());
        self
    }
}
