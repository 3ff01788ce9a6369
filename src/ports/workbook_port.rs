//! Workbook loading port trait.

use crate::domain::error::FinsheetError;
use crate::domain::workbook::Workbook;
use std::path::Path;

pub trait WorkbookPort {
    /// Read every sheet of the file at `path`, in declaration order.
    ///
    /// Any failure to open or decode the file is a `FinsheetError::Workbook`.
    fn load(&self, path: &Path) -> Result<Workbook, FinsheetError>;
}
