//! Analysis settings assembled from a [`ConfigPort`].
//!
//! Every key is optional; a missing key takes the default listed here. A key
//! that is present but unparseable is a configuration error, not a silent
//! default.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::config_validation::validate_settings;
use crate::domain::error::FinsheetError;
use crate::domain::recommend::RecommendationThresholds;
use crate::domain::score::{MarketContext, ScoreEngine, ScoreWeights, BENCHMARK_NPM};
use crate::ports::config_port::ConfigPort;
use std::time::Duration;

pub const DEFAULT_EBITDA_REVENUE_SHARE: f64 = 0.20;
pub const DEFAULT_COST_REDUCTION_TARGET: f64 = 0.05;
pub const DEFAULT_REQUIRED_METRICS: &str = "revenue, expenses";
pub const DEFAULT_INTEL_TIMEOUT_MS: i64 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub market: MarketContext,
    pub score: ScoreEngine,
    pub ebitda_revenue_share: f64,
    pub cost_reduction_target: f64,
    pub thresholds: RecommendationThresholds,
    pub required_metrics: Vec<CanonicalMetric>,
    pub intel_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            market: MarketContext::default(),
            score: ScoreEngine::default(),
            ebitda_revenue_share: DEFAULT_EBITDA_REVENUE_SHARE,
            cost_reduction_target: DEFAULT_COST_REDUCTION_TARGET,
            thresholds: RecommendationThresholds::default(),
            required_metrics: vec![CanonicalMetric::Revenue, CanonicalMetric::Expenses],
            intel_timeout: Duration::from_millis(DEFAULT_INTEL_TIMEOUT_MS as u64),
        }
    }
}

/// Validate the configuration, then build [`Settings`] from it.
pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, FinsheetError> {
    validate_settings(config)?;

    let defaults = Settings::default();
    let market = MarketContext {
        company_name: config
            .get_string("market", "company_name")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.market.company_name),
        total_market_size: read_number(
            config,
            "market",
            "total_market_size",
            defaults.market.total_market_size,
        )?,
        innovation: read_number(config, "market", "innovation", defaults.market.innovation)?,
        brand_strength: read_number(
            config,
            "market",
            "brand_strength",
            defaults.market.brand_strength,
        )?,
    };

    let weights = read_weights(config)?;
    let benchmark_npm = read_number(config, "scoring", "benchmark_npm", BENCHMARK_NPM)?;

    let thresholds = RecommendationThresholds {
        max_debt_equity: read_number(
            config,
            "recommendations",
            "max_debt_equity",
            defaults.thresholds.max_debt_equity,
        )?,
        min_npm: read_number(config, "recommendations", "min_npm", defaults.thresholds.min_npm)?,
        min_current_ratio: read_number(
            config,
            "recommendations",
            "min_current_ratio",
            defaults.thresholds.min_current_ratio,
        )?,
    };

    let required = config
        .get_string("validation", "required_metrics")
        .unwrap_or_else(|| DEFAULT_REQUIRED_METRICS.to_string());
    let required_metrics =
        parse_metric_list(&required).map_err(|reason| FinsheetError::ConfigInvalid {
            section: "validation".into(),
            key: "required_metrics".into(),
            reason,
        })?;

    let timeout_ms = config.get_int("intel", "timeout_ms", DEFAULT_INTEL_TIMEOUT_MS);

    Ok(Settings {
        market,
        score: ScoreEngine::new(weights, benchmark_npm),
        ebitda_revenue_share: read_number(
            config,
            "heuristics",
            "ebitda_revenue_share",
            DEFAULT_EBITDA_REVENUE_SHARE,
        )?,
        cost_reduction_target: read_number(
            config,
            "heuristics",
            "cost_reduction_target",
            DEFAULT_COST_REDUCTION_TARGET,
        )?,
        thresholds,
        required_metrics,
        intel_timeout: Duration::from_millis(timeout_ms.max(1) as u64),
    })
}

pub(crate) fn read_weights(config: &dyn ConfigPort) -> Result<ScoreWeights, FinsheetError> {
    let d = ScoreWeights::default();
    Ok(ScoreWeights {
        market_share: read_number(config, "scoring", "weight_market_share", d.market_share)?,
        revenue_growth: read_number(config, "scoring", "weight_revenue_growth", d.revenue_growth)?,
        profitability: read_number(config, "scoring", "weight_profitability", d.profitability)?,
        innovation: read_number(config, "scoring", "weight_innovation", d.innovation)?,
        brand_strength: read_number(config, "scoring", "weight_brand_strength", d.brand_strength)?,
    })
}

/// A float key: the default when absent, an error when present but not a number.
pub(crate) fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, FinsheetError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FinsheetError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{}' is not a number", raw.trim()),
            }),
    }
}

/// Parse a comma-separated list of metric keys, e.g. `revenue, netProfit`.
pub fn parse_metric_list(raw: &str) -> Result<Vec<CanonicalMetric>, String> {
    let mut metrics = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let metric =
            CanonicalMetric::from_key(name).ok_or_else(|| format!("unknown metric '{name}'"))?;
        if !metrics.contains(&metric) {
            metrics.push(metric);
        }
    }
    Ok(metrics)
}
