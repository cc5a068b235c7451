//! The normalizers run between the completeness and duplicate filters.

use crate::cleaner::{
    normalize_benefit_date, normalize_categorical, normalize_currency, normalize_district,
    normalize_free_text, normalize_neighborhood,
};
use crate::config::ColumnNames;
use crate::error::Result;
use crate::table::RequestTable;
use serde::{Deserialize, Serialize};

/// One column normalizer of the cleaning pipeline.
///
/// Each step reads and writes exactly one configured column, so the steps
/// commute: any order yields the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStep {
    /// Lowercase category
    Sex,
    /// Lowercase category
    EnterpriseType,
    /// Lowercased free text, separators as spaces, trimmed
    BusinessIdea,
    /// Lowercased, separators as spaces, whitespace kept
    Neighborhood,
    /// Truncated integer category
    District,
    /// Day-first date
    BenefitDate,
    /// Currency string to integer
    CreditAmount,
    /// Lowercased free text, separators as spaces, trimmed
    CreditLine,
}

impl CleaningStep {
    /// All normalizers in their default run order.
    pub const NORMALIZERS: [CleaningStep; 8] = [
        Self::Sex,
        Self::EnterpriseType,
        Self::BusinessIdea,
        Self::Neighborhood,
        Self::District,
        Self::BenefitDate,
        Self::CreditAmount,
        Self::CreditLine,
    ];

    /// Returns a human-readable name for the step.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sex => "Normalizing sex",
            Self::EnterpriseType => "Normalizing enterprise type",
            Self::BusinessIdea => "Normalizing business idea",
            Self::Neighborhood => "Normalizing neighborhood",
            Self::District => "Normalizing district",
            Self::BenefitDate => "Parsing benefit date",
            Self::CreditAmount => "Normalizing credit amount",
            Self::CreditLine => "Normalizing credit line",
        }
    }

    /// The configured column this step rewrites.
    pub fn column<'a>(&self, columns: &'a ColumnNames) -> &'a str {
        match self {
            Self::Sex => &columns.sex,
            Self::EnterpriseType => &columns.enterprise_type,
            Self::BusinessIdea => &columns.business_idea,
            Self::Neighborhood => &columns.neighborhood,
            Self::District => &columns.district,
            Self::BenefitDate => &columns.benefit_date,
            Self::CreditAmount => &columns.credit_amount,
            Self::CreditLine => &columns.credit_line,
        }
    }

    /// Run this step on its column, returning a new table.
    pub fn apply(&self, table: &RequestTable, columns: &ColumnNames) -> Result<RequestTable> {
        let column = self.column(columns);
        match self {
            Self::Sex | Self::EnterpriseType => normalize_categorical(table, column),
            Self::BusinessIdea | Self::CreditLine => normalize_free_text(table, column),
            Self::Neighborhood => normalize_neighborhood(table, column),
            Self::District => normalize_district(table, column),
            Self::BenefitDate => normalize_benefit_date(table, column),
            Self::CreditAmount => normalize_currency(table, column),
        }
    }
}

impl std::fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
