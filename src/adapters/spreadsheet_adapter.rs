//! Spreadsheet workbook adapter (xlsx, xlsm, xlsb, xls, ods) backed by calamine.

use crate::domain::error::FinsheetError;
use crate::domain::workbook::{Cell, Sheet, Workbook};
use crate::ports::workbook_port::WorkbookPort;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use log::{debug, warn};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetAdapter;

impl SpreadsheetAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookPort for SpreadsheetAdapter {
    fn load(&self, path: &Path) -> Result<Workbook, FinsheetError> {
        let workbook_error = |reason: String| FinsheetError::Workbook {
            path: path.display().to_string(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
        let names = workbook.sheet_names().to_owned();
        let sheets = read_sheets(names, |name| workbook.worksheet_range(name));
        Ok(Workbook::new(sheets))
    }
}

/// Read every named sheet. A sheet whose range cannot be read is logged and
/// left out; the rest of the workbook is still returned.
fn read_sheets<E, F>(names: Vec<String>, mut read_range: F) -> Vec<Sheet>
where
    E: std::fmt::Display,
    F: FnMut(&str) -> Result<Range<Data>, E>,
{
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match read_range(&name) {
            Ok(range) => {
                debug!("read sheet '{}' ({:?})", name, range.get_size());
                sheets.push(sheet_from_range(name, &range));
            }
            Err(e) => warn!("sheet '{}' unreadable, skipped: {}", name, e),
        }
    }
    sheets
}

/// Rebuild the grid at its absolute position; calamine ranges start at the
/// first used cell, not at A1.
fn sheet_from_range(name: String, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    Sheet::new(name, rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Date(d.date()))
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(_) | Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
