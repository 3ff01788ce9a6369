//! In-memory workbook model.
//!
//! A workbook is created per upload by a
//! [`WorkbookPort`](crate::ports::workbook_port::WorkbookPort) adapter and
//! discarded once extraction is done.

use chrono::{Datelike, NaiveDate};

/// A single cell value as read from the file.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Trimmed text content, if the cell holds text.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.trim()),
            _ => None,
        }
    }

    /// Numeric reading used for header detection: numbers as-is, text that
    /// parses as a plain float, and dates as their calendar year.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Date(d) => Some(f64::from(d.year())),
            _ => None,
        }
    }

    /// Lower-cased text used for keyword scans. Numbers and dates yield `None`.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.to_lowercase()),
            _ => None,
        }
    }
}

/// A named 2-D grid. Rows may be ragged; missing cells read as [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Ordered sequence of sheets, in the order the file declares them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

/// Sheet-name fragments that route a sheet into the pipeline.
pub const ROUTED_SHEET_KINDS: [&str; 6] = [
    "Income Statement",
    "Balance Sheet",
    "Cash Flows",
    "Financial Summary",
    "Consolidated Statements",
    "Consolidated Balance",
];

/// Case-insensitive substring match against [`ROUTED_SHEET_KINDS`].
pub fn is_routed_sheet(name: &str) -> bool {
    let lower = name.to_lowercase();
    ROUTED_SHEET_KINDS
        .iter()
        .any(|kind| lower.contains(&kind.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_read_as_empty() {
        let sheet = Sheet::new(
            "Income Statement",
            vec![vec![Cell::text("Revenue"), Cell::Number(10.0)], vec![]],
        );
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.cell(1, 1), &Cell::Empty);
        assert_eq!(sheet.cell(9, 9), &Cell::Empty);
    }

    #[test]
    fn numeric_value_reads_text_and_dates() {
        assert_eq!(Cell::text(" 2023 ").numeric_value(), Some(2023.0));
        assert_eq!(Cell::text("FY2023").numeric_value(), None);
        let date = NaiveDate::from_ymd_opt(2022, 3, 31).unwrap();
        assert_eq!(Cell::Date(date).numeric_value(), Some(2022.0));
        assert_eq!(Cell::Number(f64::NAN).numeric_value(), None);
    }

    #[test]
    fn routing_is_case_insensitive_substring() {
        assert!(is_routed_sheet("Consolidated income statement"));
        assert!(is_routed_sheet("BALANCE SHEET 2023"));
        assert!(is_routed_sheet("Cash Flows"));
        assert!(!is_routed_sheet("Cash Flow"));
        assert!(!is_routed_sheet("Notes"));
    }
}
