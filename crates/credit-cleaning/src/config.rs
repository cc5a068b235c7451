//! Configuration types for the cleaning pipeline.
//!
//! The defaults describe the historical `solicitudes_credito.csv` layout:
//! semicolon separated, Spanish column headers, and the conventional set of
//! missing-value markers used by tabular readers.

use crate::utils::DEFAULT_MISSING_MARKERS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Names of the eight columns the pipeline normalizes.
///
/// Any other column in the source is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Applicant sex, normalized as a lowercase category.
    pub sex: String,
    /// Enterprise type, normalized as a lowercase category.
    pub enterprise_type: String,
    /// Free-text business idea.
    pub business_idea: String,
    /// Neighborhood name (never trimmed).
    pub neighborhood: String,
    /// District number, stored as a float-like string in the source.
    pub district: String,
    /// Date the credit benefit was granted.
    pub benefit_date: String,
    /// Credit amount written as a currency string.
    pub credit_amount: String,
    /// Free-text credit line.
    pub credit_line: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sex: "sexo".to_string(),
            enterprise_type: "tipo_de_emprendimiento".to_string(),
            business_idea: "idea_negocio".to_string(),
            neighborhood: "barrio".to_string(),
            district: "comuna_ciudadano".to_string(),
            benefit_date: "fecha_de_beneficio".to_string(),
            credit_amount: "monto_del_credito".to_string(),
            credit_line: "línea_credito".to_string(),
        }
    }
}

impl ColumnNames {
    /// All configured names, in normalizer order.
    pub fn all(&self) -> [&str; 8] {
        [
            self.sex.as_str(),
            self.enterprise_type.as_str(),
            self.business_idea.as_str(),
            self.neighborhood.as_str(),
            self.district.as_str(),
            self.benefit_date.as_str(),
            self.credit_amount.as_str(),
            self.credit_line.as_str(),
        ]
    }
}

/// Configuration for loading and cleaning a credit request table.
///
/// Use [`CleaningConfig::builder()`] for a fluent, validated setup.
///
/// # Example
///
/// ```rust,ignore
/// use credit_cleaning::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .separator(b',')
///     .missing_markers(["", "NA"])
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Field separator of the source file.
    /// Default: `;`
    pub separator: u8,

    /// Column names of the eight normalized fields.
    pub columns: ColumnNames,

    /// Cell texts treated as missing values on load (exact match).
    /// Default: the conventional tabular-reader set, including the empty string.
    pub missing_markers: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            separator: b';',
            columns: ColumnNames::default(),
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if matches!(self.separator, b'"' | b'\n' | b'\r') || !self.separator.is_ascii() {
            return Err(ConfigValidationError::InvalidSeparator(
                self.separator as char,
            ));
        }

        let names = self.columns.all();
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName);
            }
            if !seen.insert(name) {
                return Err(ConfigValidationError::DuplicateColumnName(
                    name.to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing keys take their
    /// default values.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let config: CleaningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid separator {0:?} (must be an ASCII character other than a quote or line break)")]
    InvalidSeparator(char),

    #[error("Column names must not be empty")]
    EmptyColumnName,

    #[error("Column '{0}' is configured for more than one field")]
    DuplicateColumnName(String),
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    separator: Option<u8>,
    columns: Option<ColumnNames>,
    missing_markers: Option<Vec<String>>,
}

impl CleaningConfigBuilder {
    /// Set the field separator of the source file.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set all eight field column names at once.
    pub fn columns(mut self, columns: ColumnNames) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Replace the missing-value markers.
    ///
    /// Matching is exact: `"NA"` does not match `" NA"` or `"na"`.
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            separator: self.separator.unwrap_or(defaults.separator),
            columns: self.columns.unwrap_or(defaults.columns),
            missing_markers: self.missing_markers.unwrap_or(defaults.missing_markers),
        };

        config.validate()?;
        Ok(config)
    }
}
