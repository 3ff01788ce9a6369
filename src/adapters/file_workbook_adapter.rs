//! Picks a workbook reader from the file extension.

use crate::adapters::csv_workbook_adapter::CsvWorkbookAdapter;
use crate::domain::error::FinsheetError;
use crate::domain::workbook::Workbook;
use crate::ports::workbook_port::WorkbookPort;
use std::path::Path;

pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Default, Clone, Copy)]
pub struct FileWorkbookAdapter;

impl FileWorkbookAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookPort for FileWorkbookAdapter {
    fn load(&self, path: &Path) -> Result<Workbook, FinsheetError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension == "csv" {
            return CsvWorkbookAdapter::new().load(path);
        }
        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            return load_spreadsheet(path);
        }
        Err(FinsheetError::Workbook {
            path: path.display().to_string(),
            reason: format!("unsupported file type '.{extension}'"),
        })
    }
}

#[cfg(feature = "excel")]
fn load_spreadsheet(path: &Path) -> Result<Workbook, FinsheetError> {
    crate::adapters::spreadsheet_adapter::SpreadsheetAdapter::new().load(path)
}

#[cfg(not(feature = "excel"))]
fn load_spreadsheet(path: &Path) -> Result<Workbook, FinsheetError> {
    Err(FinsheetError::Workbook {
        path: path.display().to_string(),
        reason: "spreadsheet support requires the `excel` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn csv_is_dispatched_by_extension() {
        let mut file = Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "Revenue,2023").unwrap();
        let workbook = FileWorkbookAdapter::new().load(file.path()).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = FileWorkbookAdapter::new()
            .load(Path::new("report.pdf"))
            .unwrap_err();
        match err {
            FinsheetError::Workbook { reason, .. } => assert!(reason.contains(".pdf")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
