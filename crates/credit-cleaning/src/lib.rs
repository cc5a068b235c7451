//! Credit Request Cleaning Library
//!
//! Cleans tabular credit request data built on Rust and Polars.
//!
//! # Overview
//!
//! Given a semicolon-separated table of credit requests whose first column is
//! a row identifier, the pipeline:
//!
//! - **Drops incomplete rows**: any row with a missing field is removed
//! - **Normalizes labels**: sex and enterprise type become lowercase categories
//! - **Normalizes text**: business idea, credit line and neighborhood are
//!   lowercased with `-` and `_` turned into spaces
//! - **Converts types**: districts to integers, currency strings to integer
//!   amounts, day-first date strings to datetimes
//! - **Drops duplicates**: the first of several identical rows is kept
//!
//! Type and date conversion failures abort the run.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use credit_cleaning::clean_data;
//!
//! let cleaned = clean_data("solicitudes_credito.csv")?;
//! println!("{}", cleaned.frame().head(Some(5)));
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] to change the separator, column names or the
//! missing-value markers:
//!
//! ```rust,ignore
//! use credit_cleaning::{clean_data_with_config, CleaningConfig};
//!
//! let config = CleaningConfig::builder()
//!     .separator(b',')
//!     .missing_markers(["", "NA", "-"])
//!     .build()?;
//!
//! let cleaned = clean_data_with_config("requests.csv", &config)?;
//! ```
//!
//! # Intermediate Stages
//!
//! Every operation borrows a [`RequestTable`] and returns a new one, so
//! callers can keep and inspect each stage:
//!
//! ```rust,ignore
//! use credit_cleaning::cleaner::{drop_incomplete_rows, normalize_categorical};
//! use credit_cleaning::{read_requests, CleaningConfig};
//!
//! let raw = read_requests(&content, &CleaningConfig::default())?;
//! let complete = drop_incomplete_rows(&raw)?;
//! let labelled = normalize_categorical(&complete, "sexo")?;
//! assert!(labelled.is_categorical("sexo"));
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod table;
pub mod utils;

// Re-exports for convenient access
pub use config::{CleaningConfig, CleaningConfigBuilder, ColumnNames, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use loader::{load_requests, read_requests};
pub use pipeline::{CleaningStep, RequestCleaner, clean_data, clean_data_with_config};
pub use table::RequestTable;
