//! Per-sheet metric extraction.
//!
//! Rows below the header whose column-0 label exactly matches an alias of a
//! metric the sheet is eligible for are read across the year columns. Each
//! eligible metric then adopts its first alias present, in catalog order, or
//! falls back to its derivation rule.

use crate::domain::catalog::{CanonicalMetric, Derivation, MetricCatalog, MetricDefinition};
use crate::domain::error::SheetExtractionError;
use crate::domain::metadata::ExcelMetadata;
use crate::domain::normalize::{clean, ValueKind};
use crate::domain::series::FinancialSeries;
use crate::domain::workbook::Sheet;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProcessingResult {
    pub sheet_name: String,
    pub success: bool,
    pub partial_series: FinancialSeries,
    pub error: Option<String>,
}

impl SheetProcessingResult {
    pub fn succeeded(sheet_name: impl Into<String>, partial_series: FinancialSeries) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            success: true,
            partial_series,
            error: None,
        }
    }

    pub fn failed(sheet_name: impl Into<String>, error: &SheetExtractionError) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            success: false,
            partial_series: FinancialSeries::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Raw label → values read from the relevant rows of one sheet.
type RawSeries<'s> = HashMap<&'s str, Vec<f64>>;

pub struct SheetExtractor<'a> {
    catalog: &'a MetricCatalog,
    ebitda_revenue_share: f64,
}

impl<'a> SheetExtractor<'a> {
    pub fn new(catalog: &'a MetricCatalog, ebitda_revenue_share: f64) -> Self {
        Self {
            catalog,
            ebitda_revenue_share,
        }
    }

    pub fn process(&self, sheet: &Sheet, metadata: &ExcelMetadata) -> SheetProcessingResult {
        match self.extract(sheet, metadata) {
            Ok(series) => {
                debug!(
                    "sheet '{}': extracted {} metrics",
                    sheet.name,
                    series.len()
                );
                SheetProcessingResult::succeeded(&sheet.name, series)
            }
            Err(e) => {
                warn!("sheet '{}' skipped: {}", sheet.name, e);
                SheetProcessingResult::failed(&sheet.name, &e)
            }
        }
    }

    pub fn extract(
        &self,
        sheet: &Sheet,
        metadata: &ExcelMetadata,
    ) -> Result<FinancialSeries, SheetExtractionError> {
        check_metadata(sheet, metadata)?;
        let raw = self.read_relevant_rows(sheet, metadata);

        let mut series = FinancialSeries::new();
        for definition in self.catalog.eligible_for(&sheet.name) {
            let values = first_alias_present(definition, &raw)
                .cloned()
                .or_else(|| {
                    definition
                        .derivation
                        .and_then(|rule| self.derive(rule, &raw))
                });
            // An empty series carries no periods and would block later sheets in the merge.
            if let Some(values) = values.filter(|v| !v.is_empty()) {
                series.insert(definition.metric, values);
            }
        }
        Ok(series)
    }

    fn read_relevant_rows<'s>(&self, sheet: &'s Sheet, metadata: &ExcelMetadata) -> RawSeries<'s> {
        let mut raw = RawSeries::new();

        for (row_idx, row) in sheet
            .rows()
            .enumerate()
            .skip(metadata.header_row_index + 1)
        {
            let Some(label) = row.first().and_then(|c| c.as_label()) else {
                continue;
            };
            let relevant = self
                .catalog
                .metrics_for_label(label)
                .into_iter()
                .any(|metric| self.catalog.sheet_qualifies(&sheet.name, metric));
            if !relevant {
                continue;
            }
            if raw.contains_key(label) {
                debug!(
                    "sheet '{}': duplicate row '{}' at {} ignored",
                    sheet.name, label, row_idx
                );
                continue;
            }

            let values = metadata
                .year_column_indices
                .iter()
                .map(|&col| {
                    let cell = sheet.cell(row_idx, col);
                    clean(cell, ValueKind::infer(cell))
                })
                .collect();
            raw.insert(label, values);
        }

        raw
    }

    fn derive(&self, rule: Derivation, raw: &RawSeries<'_>) -> Option<Vec<f64>> {
        match rule {
            Derivation::ShareOfBase { base } => {
                let base = self.base_series(base, raw)?;
                Some(base.iter().map(|v| v * self.ebitda_revenue_share).collect())
            }
            Derivation::Ratio {
                numerator,
                denominator,
            } => {
                let num = self.base_series(numerator, raw)?;
                let den = self.base_series(denominator, raw)?;
                Some(
                    num.iter()
                        .zip(den)
                        .map(|(n, d)| safe_div(*n, *d))
                        .collect(),
                )
            }
            Derivation::MarginOver { base, subtracted } => {
                let base = self.base_series(base, raw)?;
                let sub = self.base_series(subtracted, raw)?;
                Some(
                    base.iter()
                        .zip(sub)
                        .map(|(b, s)| safe_div(b - s, *b))
                        .collect(),
                )
            }
        }
    }

    /// Directly reported series for a base metric; derivations do not chain.
    fn base_series<'r>(
        &self,
        metric: CanonicalMetric,
        raw: &'r RawSeries<'_>,
    ) -> Option<&'r Vec<f64>> {
        self.catalog
            .definition(metric)
            .and_then(|d| first_alias_present(d, raw))
    }
}

fn first_alias_present<'r>(
    definition: &MetricDefinition,
    raw: &'r RawSeries<'_>,
) -> Option<&'r Vec<f64>> {
    definition.aliases.iter().find_map(|alias| raw.get(alias))
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn check_metadata(sheet: &Sheet, metadata: &ExcelMetadata) -> Result<(), SheetExtractionError> {
    let height = sheet.height();
    if height > 0 && metadata.header_row_index >= height {
        return Err(SheetExtractionError::HeaderRowOutOfBounds {
            row: metadata.header_row_index,
            height,
        });
    }

    let width = sheet.width();
    for pair in metadata.year_column_indices.windows(2) {
        if pair[1] <= pair[0] {
            return Err(SheetExtractionError::YearColumnsNotIncreasing {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    if let Some(&column) = metadata.year_column_indices.iter().find(|&&c| c >= width) {
        return Err(SheetExtractionError::MetadataOutOfBounds { column, width });
    }
    Ok(())
}
