//! Header-region metadata detection.
//!
//! Scans the first [`HEADER_SEARCH_ROWS`] rows of a sheet for scale and
//! currency hints, the header row and the year columns. Detection never
//! fails: anything it cannot find is replaced by a default and reported as a
//! [`MetadataWarning`].
//!
//! The header row is the bottom-most row in the window containing a trigger
//! phrase. A data row such as "Net sales" that sits inside the window also
//! counts as a trigger and moves the header down onto itself.

use crate::domain::workbook::{Cell, Sheet};
use log::debug;
use serde::Serialize;

pub const HEADER_SEARCH_ROWS: usize = 10;
pub const HEADER_TRIGGERS: [&str; 3] = ["net sales", "revenue", "income"];
pub const MILLION_MARKERS: [&str; 2] = ["million", "in millions"];
pub const YEAR_RANGE: std::ops::RangeInclusive<f64> = 2000.0..=2100.0;
pub const DEFAULT_CURRENCY: &str = "USD";

const CURRENCY_SYMBOLS: [(&str, &str); 5] = [
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
];

const CURRENCY_WORDS: [(&str, &str); 7] = [
    ("usd", "USD"),
    ("eur", "EUR"),
    ("gbp", "GBP"),
    ("jpy", "JPY"),
    ("inr", "INR"),
    ("rs", "INR"),
    ("rupees", "INR"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelMetadata {
    pub is_in_millions: bool,
    pub currency: String,
    pub header_row_index: usize,
    /// Strictly increasing column indices holding year headers.
    pub year_column_indices: Vec<usize>,
    /// The year read from each of `year_column_indices`.
    pub years: Vec<i32>,
}

impl Default for ExcelMetadata {
    fn default() -> Self {
        Self {
            is_in_millions: false,
            currency: DEFAULT_CURRENCY.to_string(),
            header_row_index: 0,
            year_column_indices: Vec::new(),
            years: Vec::new(),
        }
    }
}

/// Non-fatal detection findings. Defaults have already been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataWarning {
    HeaderRowNotFound,
    NoYearColumns,
    CurrencyNotDetected,
}

impl MetadataWarning {
    /// What was missing and the default used in its place.
    pub fn describe(&self) -> &'static str {
        match self {
            MetadataWarning::HeaderRowNotFound => "no header row found, using row 0",
            MetadataWarning::NoYearColumns => "no year columns in the header row",
            MetadataWarning::CurrencyNotDetected => "no currency found, assuming USD",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDetection {
    pub metadata: ExcelMetadata,
    pub warnings: Vec<MetadataWarning>,
}

pub fn detect_metadata(sheet: &Sheet) -> MetadataDetection {
    let mut metadata = ExcelMetadata::default();
    let mut warnings = Vec::new();
    let mut currency = None;
    let mut header_row = None;

    for (row_idx, row) in sheet.rows().take(HEADER_SEARCH_ROWS).enumerate() {
        for cell in row {
            let Some(text) = cell.search_text() else {
                continue;
            };
            if MILLION_MARKERS.iter().any(|m| text.contains(m)) {
                metadata.is_in_millions = true;
            }
            if let Some(code) = detect_currency(&text) {
                currency = Some(code);
            }
            if HEADER_TRIGGERS.iter().any(|t| text.contains(t)) {
                header_row = Some(row_idx);
            }
        }
    }

    match currency {
        Some(code) => metadata.currency = code.to_string(),
        None => warnings.push(MetadataWarning::CurrencyNotDetected),
    }

    match header_row {
        Some(row) => metadata.header_row_index = row,
        None => warnings.push(MetadataWarning::HeaderRowNotFound),
    }

    for (col, cell) in sheet.row(metadata.header_row_index).iter().enumerate() {
        if let Some(year) = year_of(cell) {
            metadata.year_column_indices.push(col);
            metadata.years.push(year);
        }
    }
    if metadata.year_column_indices.is_empty() {
        warnings.push(MetadataWarning::NoYearColumns);
    }

    debug!(
        "sheet '{}': header row {}, {} year columns, currency {}, millions={}",
        sheet.name,
        metadata.header_row_index,
        metadata.year_column_indices.len(),
        metadata.currency,
        metadata.is_in_millions
    );
    for warning in &warnings {
        debug!("sheet '{}': {}", sheet.name, warning.describe());
    }

    MetadataDetection { metadata, warnings }
}

fn year_of(cell: &Cell) -> Option<i32> {
    cell.numeric_value()
        .filter(|v| YEAR_RANGE.contains(v))
        .map(|v| v.trunc() as i32)
}

/// Last currency token in the text, symbols by substring, codes as whole words.
fn detect_currency(text: &str) -> Option<&'static str> {
    let mut found: Option<(usize, &'static str)> = None;
    let mut consider = |pos: usize, code: &'static str| {
        if found.is_none_or(|(best, _)| pos >= best) {
            found = Some((pos, code));
        }
    };

    for (symbol, code) in CURRENCY_SYMBOLS {
        if let Some(pos) = text.rfind(symbol) {
            consider(pos, code);
        }
    }

    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if let Some((_, code)) = CURRENCY_WORDS.iter().find(|(w, _)| *w == word) {
            consider(word.as_ptr() as usize - text.as_ptr() as usize, *code);
        }
    }

    found.map(|(_, code)| code)
}
