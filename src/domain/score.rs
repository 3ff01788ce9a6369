//! Weighted competitive-position score.
//!
//! `innovation` and `brand_strength` come from the market context; they are
//! never read from the workbook.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::series::FinancialSeries;
use serde::Serialize;

pub const BENCHMARK_NPM: f64 = 0.15;
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Externally supplied facts about the company's market.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub company_name: String,
    pub total_market_size: f64,
    pub innovation: f64,
    pub brand_strength: f64,
}

impl Default for MarketContext {
    fn default() -> Self {
        Self {
            company_name: "Company".to_string(),
            total_market_size: 200_000.0,
            innovation: 0.5,
            brand_strength: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub market_share: f64,
    pub revenue_growth: f64,
    pub profitability: f64,
    pub innovation: f64,
    pub brand_strength: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            market_share: 0.30,
            revenue_growth: 0.20,
            profitability: 0.20,
            innovation: 0.15,
            brand_strength: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.market_share
            + self.revenue_growth
            + self.profitability
            + self.innovation
            + self.brand_strength
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitivePositionScore {
    pub overall: f64,
    pub market_share: f64,
    pub revenue_growth: f64,
    pub profitability: f64,
    pub innovation: f64,
    pub brand_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEngine {
    pub weights: ScoreWeights,
    pub benchmark_npm: f64,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            benchmark_npm: BENCHMARK_NPM,
        }
    }
}

impl ScoreEngine {
    pub fn new(weights: ScoreWeights, benchmark_npm: f64) -> Self {
        Self {
            weights,
            benchmark_npm,
        }
    }

    pub fn compute_competitive_position(
        &self,
        series: &FinancialSeries,
        market: &MarketContext,
    ) -> CompetitivePositionScore {
        let market_share = match series.latest(CanonicalMetric::Revenue) {
            Some(revenue) if market.total_market_size > 0.0 => revenue / market.total_market_size,
            _ => 0.0,
        };

        let revenue_growth = match (
            series.latest(CanonicalMetric::Revenue),
            series.previous(CanonicalMetric::Revenue),
        ) {
            (Some(latest), Some(previous)) if previous != 0.0 => (latest - previous) / previous,
            _ => 0.0,
        };

        let profitability = match series.latest(CanonicalMetric::Npm) {
            Some(npm) if self.benchmark_npm > 0.0 => (npm / self.benchmark_npm).min(1.0),
            _ => 0.0,
        };

        let w = &self.weights;
        let overall = w.market_share * market_share
            + w.revenue_growth * revenue_growth
            + w.profitability * profitability
            + w.innovation * market.innovation
            + w.brand_strength * market.brand_strength;

        CompetitivePositionScore {
            overall,
            market_share,
            revenue_growth,
            profitability,
            innovation: market.innovation,
            brand_strength: market.brand_strength,
        }
    }
}
