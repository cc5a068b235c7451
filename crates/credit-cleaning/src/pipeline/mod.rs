//! Pipeline module.
//!
//! Runs the full cleaning sequence on a credit request table:
//!
//! 1. Load the raw source ([`crate::loader`])
//! 2. Drop rows with any missing field
//! 3. Run every [`CleaningStep`] normalizer
//! 4. Drop duplicate rows, keeping the first occurrence
//!
//! Any step error aborts the run and is returned wrapped with the step name.

mod steps;

pub use steps::CleaningStep;

use crate::cleaner::{drop_duplicate_rows, drop_incomplete_rows};
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::loader::load_requests;
use crate::table::RequestTable;
use std::path::Path;
use tracing::{debug, info};

/// Load and clean the credit requests stored at `path` with the default
/// configuration.
pub fn clean_data(path: impl AsRef<Path>) -> Result<RequestTable> {
    clean_data_with_config(path, &CleaningConfig::default())
}

/// Load and clean the credit requests stored at `path`.
pub fn clean_data_with_config(
    path: impl AsRef<Path>,
    config: &CleaningConfig,
) -> Result<RequestTable> {
    config.validate()?;
    let raw = load_requests(path, config)?;
    RequestCleaner::new(config.clone()).clean(&raw)
}

/// Cleans already loaded request tables.
///
/// # Example
///
/// ```rust,ignore
/// use credit_cleaning::{read_requests, CleaningConfig, RequestCleaner};
///
/// let config = CleaningConfig::default();
/// let raw = read_requests(&content, &config)?;
/// let cleaned = RequestCleaner::new(config).clean(&raw)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestCleaner {
    config: CleaningConfig,
}

impl RequestCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the completeness filter, every normalizer and the duplicate
    /// filter. `raw` is left untouched.
    pub fn clean(&self, raw: &RequestTable) -> Result<RequestTable> {
        self.clean_with_steps(raw, &CleaningStep::NORMALIZERS)
    }

    /// Like [`RequestCleaner::clean`] with the normalizers run in the given
    /// order.
    pub fn clean_with_steps(
        &self,
        raw: &RequestTable,
        steps: &[CleaningStep],
    ) -> Result<RequestTable> {
        info!(
            "Starting cleaning: {} rows x {} columns",
            raw.height(),
            raw.width()
        );

        info!("Step 1: Dropping incomplete rows...");
        let mut table = drop_incomplete_rows(raw).context("Dropping incomplete rows")?;

        info!("Step 2: Normalizing columns...");
        for step in steps {
            debug!("{} ('{}')", step, step.column(&self.config.columns));
            table = step
                .apply(&table, &self.config.columns)
                .context(step.display_name())?;
        }

        info!("Step 3: Dropping duplicate rows...");
        let cleaned = drop_duplicate_rows(&table).context("Dropping duplicate rows")?;

        info!(
            "Cleaning completed: {} of {} rows kept",
            cleaned.height(),
            raw.height()
        );
        Ok(cleaned)
    }
}
