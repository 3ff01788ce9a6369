//! Threshold rules producing textual recommendations.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::series::FinancialSeries;
use serde::Serialize;

pub const DEFAULT_RECOMMENDATION: &str = "Maintain current operational efficiency";

const REDUCE_DEBT: &str = "Consider reducing debt levels to improve financial stability";
const IMPROVE_MARGIN: &str = "Focus on cost optimization to improve net profit margin";
const IMPROVE_LIQUIDITY: &str = "Improve working capital management to enhance liquidity";
const REVERSE_PROFIT_DECLINE: &str =
    "Investigate the decline in net profit and protect margins on core products";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationThresholds {
    pub max_debt_equity: f64,
    pub min_npm: f64,
    pub min_current_ratio: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            max_debt_equity: 2.0,
            min_npm: 0.10,
            min_current_ratio: 1.0,
        }
    }
}

/// Ordered recommendations. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    items: Vec<String>,
}

impl Recommendations {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn headline(&self) -> &str {
        self.items
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_RECOMMENDATION)
    }
}

/// Rules read the latest period; a rule whose metric is absent does not fire.
pub fn recommend(
    series: &FinancialSeries,
    thresholds: &RecommendationThresholds,
) -> Recommendations {
    let mut items = Vec::new();

    if series
        .latest(CanonicalMetric::DebtEquityRatio)
        .is_some_and(|de| de > thresholds.max_debt_equity)
    {
        items.push(REDUCE_DEBT.to_string());
    }
    if series
        .latest(CanonicalMetric::Npm)
        .is_some_and(|npm| npm < thresholds.min_npm)
    {
        items.push(IMPROVE_MARGIN.to_string());
    }
    if series
        .latest(CanonicalMetric::CurrentRatio)
        .is_some_and(|cr| cr < thresholds.min_current_ratio)
    {
        items.push(IMPROVE_LIQUIDITY.to_string());
    }
    if let (Some(latest), Some(previous)) = (
        series.latest(CanonicalMetric::NetProfit),
        series.previous(CanonicalMetric::NetProfit),
    ) && latest < previous
    {
        items.push(REVERSE_PROFIT_DECLINE.to_string());
    }

    if items.is_empty() {
        items.push(DEFAULT_RECOMMENDATION.to_string());
    }
    Recommendations { items }
}
