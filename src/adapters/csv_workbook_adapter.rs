//! CSV file workbook adapter.
//!
//! A CSV file is a one-sheet workbook. The sheet is named after the file
//! stem with `_` and `-` read as spaces, so `income_statement_fy23.csv`
//! becomes "income statement fy23" and is routed like an income sheet.

use crate::domain::error::FinsheetError;
use crate::domain::workbook::{Cell, Sheet, Workbook};
use crate::ports::workbook_port::WorkbookPort;
use std::fs;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvWorkbookAdapter;

impl CsvWorkbookAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV text into a sheet. Rows may have differing lengths.
    pub fn read_sheet<R: Read>(name: &str, reader: R) -> Result<Sheet, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(parse_cell).collect());
        }
        Ok(Sheet::new(name, rows))
    }
}

impl WorkbookPort for CsvWorkbookAdapter {
    fn load(&self, path: &Path) -> Result<Workbook, FinsheetError> {
        let workbook_error = |reason: String| FinsheetError::Workbook {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read(path).map_err(|e| workbook_error(e.to_string()))?;
        let sheet = Self::read_sheet(&sheet_name_for(path), content.as_slice())
            .map_err(|e| workbook_error(format!("CSV parse error: {e}")))?;
        Ok(Workbook::new(vec![sheet]))
    }
}

pub fn sheet_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

/// Plain numbers become [`Cell::Number`]; anything else stays text for the normalizer.
fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn reads_ragged_rows_and_types_cells() {
        let csv = "Particulars,2022,2023\nNet sales,\"1,200\",1500\nNote\n,,(45)\n";
        let sheet = CsvWorkbookAdapter::read_sheet("Income Statement", csv.as_bytes()).unwrap();
        assert_eq!(sheet.height(), 4);
        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.cell(0, 1), &Cell::Number(2022.0));
        assert_eq!(sheet.cell(1, 1), &Cell::text("1,200"));
        assert_eq!(sheet.cell(1, 2), &Cell::Number(1500.0));
        assert_eq!(sheet.cell(2, 1), &Cell::Empty);
        assert_eq!(sheet.cell(3, 0), &Cell::Empty);
        assert_eq!(sheet.cell(3, 2), &Cell::text("(45)"));
    }

    #[test]
    fn sheet_name_comes_from_file_stem() {
        assert_eq!(
            sheet_name_for(Path::new("/tmp/Income_Statement-2023.csv")),
            "Income Statement 2023"
        );
    }

    #[test]
    fn load_reads_file_into_one_sheet() {
        let mut file = Builder::new()
            .prefix("balance_sheet_")
            .suffix(".csv")
            .tempfile()
            .unwrap();
        write!(file, "Item,2023\nCurrent Ratio,1.4\n").unwrap();

        let workbook = CsvWorkbookAdapter::new().load(file.path()).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert!(workbook.sheets[0].name.starts_with("balance sheet "));
        assert_eq!(workbook.sheets[0].cell(1, 1), &Cell::Number(1.4));
    }

    #[test]
    fn missing_file_is_a_workbook_error() {
        let err = CsvWorkbookAdapter::new()
            .load(Path::new("/nonexistent/income.csv"))
            .unwrap_err();
        assert!(matches!(err, FinsheetError::Workbook { .. }));
    }
}
