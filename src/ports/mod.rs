//! Port traits at the I/O seams.

pub mod config_port;
pub mod market_intel_port;
pub mod workbook_port;
