//! Domain error types.
//!
//! Only two failure kinds ever reach a caller: an unreadable workbook and a
//! broken configuration. Sheet-level problems are captured into
//! [`SheetExtractionError`] and stay local to the sheet; a dataset that fails
//! validation is replaced by the reference dataset and reported through
//! [`ValidationFailure`].

use crate::domain::catalog::CanonicalMetric;

/// Failure to pull series out of one sheet. Never aborts the workbook.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetExtractionError {
    #[error("year column {column} is outside the sheet's {width} columns")]
    MetadataOutOfBounds { column: usize, width: usize },

    #[error("year columns must be strictly increasing (got {previous} then {next})")]
    YearColumnsNotIncreasing { previous: usize, next: usize },

    #[error("header row {row} is outside the sheet's {height} rows")]
    HeaderRowOutOfBounds { row: usize, height: usize },

    #[error("extraction panicked: {0}")]
    Panicked(String),
}

/// Why a merged dataset was rejected in favour of the reference dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationFailure {
    #[error("merged dataset has no usable metrics")]
    NoUsableMetrics,

    #[error("required metrics missing: {}", format_metrics(.metrics))]
    MissingRequired { metrics: Vec<CanonicalMetric> },

    #[error("required metric {metric} contains a non-numeric value")]
    NonNumeric { metric: CanonicalMetric },
}

fn format_metrics(metrics: &[CanonicalMetric]) -> String {
    metrics
        .iter()
        .map(|m| m.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level error type for finsheet.
#[derive(Debug, thiserror::Error)]
pub enum FinsheetError {
    #[error("cannot read workbook {path}: {reason}")]
    Workbook { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FinsheetError {
    /// Message suitable for showing to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            FinsheetError::Workbook { .. } | FinsheetError::Io(_) => {
                "The uploaded file could not be read. Please check that it is a valid \
                 spreadsheet (.xlsx, .xls, .ods or .csv) and try again."
                    .to_string()
            }
            FinsheetError::ConfigParse { .. }
            | FinsheetError::ConfigInvalid { .. } => {
                format!("The analysis settings are invalid: {self}")
            }
            FinsheetError::Validation(_) => {
                "No usable financial data was found; reference figures are shown instead."
                    .to_string()
            }
            FinsheetError::Serialization(_) => {
                "The analysis report could not be written.".to_string()
            }
        }
    }
}

impl From<&FinsheetError> for std::process::ExitCode {
    fn from(err: &FinsheetError) -> Self {
        let code: u8 = match err {
            FinsheetError::Io(_)
            | FinsheetError::Workbook { .. }
            | FinsheetError::Serialization(_) => 1,
            FinsheetError::ConfigParse { .. }
            | FinsheetError::ConfigInvalid { .. } => 2,
            FinsheetError::Validation(_) => 3,
        };
        std::process::ExitCode::from(code)
    }
}
