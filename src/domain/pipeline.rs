//! End-to-end analysis of one workbook.
//!
//! Routed sheets are extracted on scoped threads, one per sheet, and the
//! results are collected back in workbook order before merging. A sheet that
//! panics is reported as a failed sheet; the others are unaffected.

use crate::domain::anomaly::{self, AnomalyFlag};
use crate::domain::catalog::{CanonicalMetric, MetricCatalog};
use crate::domain::error::{FinsheetError, SheetExtractionError};
use crate::domain::extract::{SheetExtractor, SheetProcessingResult};
use crate::domain::insights::{generate_insights, DashboardInsights, InsightContext};
use crate::domain::intel::BoundedMarketIntel;
use crate::domain::merge::combine;
use crate::domain::metadata::{detect_metadata, ExcelMetadata, MetadataWarning};
use crate::domain::recommend::{recommend, Recommendations};
use crate::domain::score::CompetitivePositionScore;
use crate::domain::series::FinancialSeries;
use crate::domain::settings::Settings;
use crate::domain::validation::{resolve_dataset, DatasetOrigin};
use crate::domain::workbook::{is_routed_sheet, Sheet, Workbook};
use crate::ports::market_intel_port::{MarketIntelPort, Sentiment};
use crate::ports::workbook_port::WorkbookPort;
use log::info;
use serde::Serialize;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub name: String,
    pub success: bool,
    pub error: Option<String>,
    pub metadata: Option<ExcelMetadata>,
    pub warnings: Vec<MetadataWarning>,
    pub metrics: Vec<CanonicalMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub sheets: Vec<SheetSummary>,
    pub skipped_sheets: Vec<String>,
    pub series: FinancialSeries,
    pub origin: DatasetOrigin,
    pub anomalies: Vec<AnomalyFlag>,
    pub score: CompetitivePositionScore,
    pub recommendations: Recommendations,
    pub recommendation: String,
    pub insights: DashboardInsights,
    pub competitors: Vec<String>,
    pub sentiment: Sentiment,
}

impl AnalysisReport {
    pub fn anomaly_count(&self) -> usize {
        self.anomalies.iter().filter(|a| a.is_anomaly).count()
    }
}

/// Metadata detection plus extraction for one routed sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome {
    pub metadata: Option<ExcelMetadata>,
    pub warnings: Vec<MetadataWarning>,
    pub result: SheetProcessingResult,
}

impl SheetOutcome {
    fn summary(&self) -> SheetSummary {
        SheetSummary {
            name: self.result.sheet_name.clone(),
            success: self.result.success,
            error: self.result.error.clone(),
            metadata: self.metadata.clone(),
            warnings: self.warnings.clone(),
            metrics: self.result.partial_series.metrics().collect(),
        }
    }
}

pub struct Pipeline {
    settings: Settings,
    catalog: &'static MetricCatalog,
    intel: BoundedMarketIntel,
}

impl Pipeline {
    pub fn new(settings: Settings, intel: Arc<dyn MarketIntelPort>) -> Self {
        let intel = BoundedMarketIntel::new(intel, settings.intel_timeout);
        Self {
            settings,
            catalog: MetricCatalog::standard(),
            intel,
        }
    }

    /// Load a workbook through `port` and analyse it. Only an unreadable
    /// file is an error.
    pub fn run_file(
        &self,
        port: &dyn WorkbookPort,
        path: &Path,
    ) -> Result<AnalysisReport, FinsheetError> {
        let workbook = port.load(path)?;
        info!(
            "loaded {} with {} sheets",
            path.display(),
            workbook.sheets.len()
        );
        Ok(self.run(&workbook))
    }

    pub fn run(&self, workbook: &Workbook) -> AnalysisReport {
        let (routed, skipped): (Vec<&Sheet>, Vec<&Sheet>) = workbook
            .sheets
            .iter()
            .partition(|s| is_routed_sheet(&s.name));
        let skipped_sheets: Vec<String> = skipped.iter().map(|s| s.name.clone()).collect();
        info!(
            "{} routed sheets, {} skipped",
            routed.len(),
            skipped_sheets.len()
        );

        let outcomes = self.extract_sheets(&routed);
        let results: Vec<SheetProcessingResult> =
            outcomes.iter().map(|o| o.result.clone()).collect();

        let merged = combine(&results);
        info!(
            "merged {} metrics over {} periods",
            merged.len(),
            merged.max_len()
        );
        let (series, origin) = resolve_dataset(merged, &self.settings.required_metrics);

        let anomalies = anomaly::detect(&series);
        let score = self
            .settings
            .score
            .compute_competitive_position(&series, &self.settings.market);
        let recommendations = recommend(&series, &self.settings.thresholds);
        let recommendation = recommendations.headline().to_string();

        let competitors = self.intel.competitors(&self.settings.market.company_name);
        let sentiment = self.intel.sentiment(&recommendation);

        let insights = generate_insights(
            &series,
            &InsightContext {
                company_name: self.settings.market.company_name.clone(),
                cost_reduction_target: self.settings.cost_reduction_target,
                competitive_score: score.overall,
                competitors: competitors.clone(),
            },
        );

        AnalysisReport {
            sheets: outcomes.iter().map(SheetOutcome::summary).collect(),
            skipped_sheets,
            series,
            origin,
            anomalies,
            score,
            recommendations,
            recommendation,
            insights,
            competitors,
            sentiment,
        }
    }

    /// Detect metadata and extract series for every routed sheet.
    pub fn extract_sheets(&self, sheets: &[&Sheet]) -> Vec<SheetOutcome> {
        let extractor = SheetExtractor::new(self.catalog, self.settings.ebitda_revenue_share);
        run_isolated(sheets, |sheet| {
            let detection = detect_metadata(sheet);
            let result = extractor.process(sheet, &detection.metadata);
            SheetOutcome {
                metadata: Some(detection.metadata),
                warnings: detection.warnings,
                result,
            }
        })
    }
}

/// Run `process` for each sheet on its own scoped thread. Outcomes come back
/// in input order; a panic becomes a failed outcome for that sheet only.
pub fn run_isolated<F>(sheets: &[&Sheet], process: F) -> Vec<SheetOutcome>
where
    F: Fn(&Sheet) -> SheetOutcome + Sync,
{
    let process = &process;
    thread::scope(|scope| {
        let handles: Vec<_> = sheets
            .iter()
            .map(|&sheet| scope.spawn(move || process(sheet)))
            .collect();

        handles
            .into_iter()
            .zip(sheets)
            .map(|(handle, sheet)| {
                handle.join().unwrap_or_else(|payload| {
                    let error = SheetExtractionError::Panicked(panic_message(payload.as_ref()));
                    log::warn!("sheet '{}' failed: {}", sheet.name, error);
                    SheetOutcome {
                        metadata: None,
                        warnings: Vec::new(),
                        result: SheetProcessingResult::failed(&sheet.name, &error),
                    }
                })
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
