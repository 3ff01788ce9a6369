//! Core domain types and logic: workbook model, metric catalog, extraction,
//! merging and the analyses run on the merged dataset.

pub mod workbook;
pub mod catalog;
pub mod normalize;
pub mod metadata;
pub mod series;
pub mod extract;
pub mod merge;
pub mod validation;
pub mod anomaly;
pub mod score;
pub mod recommend;
pub mod insights;
pub mod intel;
pub mod settings;
pub mod config_validation;
pub mod pipeline;
pub mod error;
