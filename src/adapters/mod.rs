//! Concrete adapter implementations for ports.

pub mod csv_workbook_adapter;
pub mod file_config_adapter;
pub mod file_workbook_adapter;
#[cfg(feature = "excel")]
pub mod spreadsheet_adapter;
pub mod static_market_intel;
