//! Settings validation.
//!
//! Checks every analysis setting before a pipeline is built from it.

use crate::domain::error::FinsheetError;
use crate::domain::score::{BENCHMARK_NPM, WEIGHT_SUM_TOLERANCE};
use crate::domain::settings::{
    parse_metric_list, read_number, read_weights, DEFAULT_COST_REDUCTION_TARGET,
    DEFAULT_EBITDA_REVENUE_SHARE,
};
use crate::ports::config_port::ConfigPort;

pub fn validate_settings(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    validate_market_size(config)?;
    validate_unit_interval(config, "market", "innovation", 0.5)?;
    validate_unit_interval(config, "market", "brand_strength", 0.5)?;
    validate_weights(config)?;
    validate_benchmark_npm(config)?;
    validate_unit_interval(
        config,
        "heuristics",
        "ebitda_revenue_share",
        DEFAULT_EBITDA_REVENUE_SHARE,
    )?;
    validate_unit_interval(
        config,
        "heuristics",
        "cost_reduction_target",
        DEFAULT_COST_REDUCTION_TARGET,
    )?;
    validate_thresholds(config)?;
    validate_required_metrics(config)?;
    validate_intel_timeout(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FinsheetError {
    FinsheetError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_market_size(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    let value = read_number(config, "market", "total_market_size", 200_000.0)?;
    if value <= 0.0 {
        return Err(invalid(
            "market",
            "total_market_size",
            "total_market_size must be positive",
        ));
    }
    Ok(())
}

fn validate_unit_interval(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), FinsheetError> {
    let value = read_number(config, section, key, default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(section, key, format!("{key} must be between 0 and 1")));
    }
    Ok(())
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    let weights = read_weights(config)?;
    let named = [
        ("weight_market_share", weights.market_share),
        ("weight_revenue_growth", weights.revenue_growth),
        ("weight_profitability", weights.profitability),
        ("weight_innovation", weights.innovation),
        ("weight_brand_strength", weights.brand_strength),
    ];
    if let Some((key, _)) = named.iter().find(|(_, w)| *w < 0.0) {
        return Err(invalid("scoring", key, format!("{key} must be non-negative")));
    }
    if !weights.is_normalized() {
        return Err(invalid(
            "scoring",
            "weight_market_share",
            format!(
                "score weights must sum to 1 (within {WEIGHT_SUM_TOLERANCE:e}), got {}",
                weights.sum()
            ),
        ));
    }
    Ok(())
}

fn validate_benchmark_npm(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    let value = read_number(config, "scoring", "benchmark_npm", BENCHMARK_NPM)?;
    if value <= 0.0 {
        return Err(invalid(
            "scoring",
            "benchmark_npm",
            "benchmark_npm must be positive",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    for key in ["max_debt_equity", "min_npm", "min_current_ratio"] {
        let value = read_number(config, "recommendations", key, 0.0)?;
        if value < 0.0 {
            return Err(invalid(
                "recommendations",
                key,
                format!("{key} must be non-negative"),
            ));
        }
    }
    Ok(())
}

fn validate_required_metrics(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    if let Some(raw) = config.get_string("validation", "required_metrics") {
        parse_metric_list(&raw)
            .map_err(|reason| invalid("validation", "required_metrics", reason))?;
    }
    Ok(())
}

fn validate_intel_timeout(config: &dyn ConfigPort) -> Result<(), FinsheetError> {
    let Some(raw) = config.get_string("intel", "timeout_ms") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(ms) if ms > 0 => Ok(()),
        Ok(_) => Err(invalid("intel", "timeout_ms", "timeout_ms must be positive")),
        Err(_) => Err(invalid(
            "intel",
            "timeout_ms",
            format!("'{}' is not a whole number of milliseconds", raw.trim()),
        )),
    }
}
