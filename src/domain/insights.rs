//! Dashboard insight text built from the latest period.
//!
//! Everything an insight needs is passed in through [`InsightContext`]; no
//! state survives between calls. Metrics the dataset lacks are read from the
//! reference dataset instead.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::series::FinancialSeries;
use crate::domain::validation::reference_dataset;
use serde::Serialize;
use std::collections::BTreeMap;

pub const INDUSTRY_SCORE: f64 = 0.88;
pub const INDUSTRY_ROE: f64 = 0.12;
pub const CURRENT_RATIO_BENCHMARK: f64 = 1.5;
pub const PROFIT_GROWTH_PROJECTION: f64 = 0.043;

const STRONG_CORRELATION: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct InsightContext {
    pub company_name: String,
    pub cost_reduction_target: f64,
    pub competitive_score: f64,
    pub competitors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub summary: String,
    pub diagnosis: String,
    pub solutions: String,
    pub profitability: String,
    pub confidence: f64,
    pub metrics: BTreeMap<&'static str, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInsights {
    pub financial: Insight,
    pub eda: Insight,
    pub competitor: Insight,
    pub kpi: Insight,
    pub ai: Insight,
}

impl DashboardInsights {
    /// Insight for a dashboard by name; unknown names get the financial view.
    pub fn view(&self, dashboard: &str) -> &Insight {
        match dashboard {
            "eda" => &self.eda,
            "competitor" => &self.competitor,
            "kpi" => &self.kpi,
            "ai" => &self.ai,
            _ => &self.financial,
        }
    }
}

/// Latest values used by every view.
struct Snapshot {
    revenue: f64,
    expenses: f64,
    net_profit: f64,
    ebitda: f64,
    roe: f64,
    npm: f64,
    current_ratio: f64,
}

impl Snapshot {
    fn from_series(series: &FinancialSeries) -> Self {
        let reference = reference_dataset();
        let latest = |metric| {
            series
                .latest(metric)
                .or_else(|| reference.latest(metric))
                .unwrap_or(0.0)
        };
        Self {
            revenue: latest(CanonicalMetric::Revenue),
            expenses: latest(CanonicalMetric::Expenses),
            net_profit: latest(CanonicalMetric::NetProfit),
            ebitda: latest(CanonicalMetric::Ebitda),
            roe: latest(CanonicalMetric::Roe),
            npm: latest(CanonicalMetric::Npm),
            current_ratio: latest(CanonicalMetric::CurrentRatio),
        }
    }
}

pub fn generate_insights(series: &FinancialSeries, context: &InsightContext) -> DashboardInsights {
    let snap = Snapshot::from_series(series);
    let correlation = pearson(
        series.get(CanonicalMetric::Revenue).unwrap_or_default(),
        series.get(CanonicalMetric::Expenses).unwrap_or_default(),
    );

    DashboardInsights {
        financial: financial_view(&snap, context),
        eda: eda_view(&snap, correlation),
        competitor: competitor_view(&snap, context),
        kpi: kpi_view(&snap),
        ai: ai_view(&snap),
    }
}

fn financial_view(s: &Snapshot, context: &InsightContext) -> Insight {
    let expense_ratio = ratio(s.expenses, s.revenue);
    let target = context.cost_reduction_target;
    Insight {
        summary: format!(
            "Revenue {:.0}, expenses {:.0}, net profit {:.0}, EBITDA {:.0}.",
            s.revenue, s.expenses, s.net_profit, s.ebitda
        ),
        diagnosis: format!(
            "Expense ratio of {:.0}% limits margin.",
            expense_ratio * 100.0
        ),
        solutions: format!(
            "Cut costs by {:.0}% ({:.0}) through supply chain efficiency.",
            target * 100.0,
            s.expenses * target
        ),
        profitability: format!(
            "Increase net profit by 2-3% ({:.0}-{:.0}) with cost efficiency.",
            s.net_profit * 0.02,
            s.net_profit * 0.03
        ),
        confidence: 0.85,
        metrics: BTreeMap::from([
            ("revenue", s.revenue),
            ("expenses", s.expenses),
            ("netProfit", s.net_profit),
            ("ebitda", s.ebitda),
            ("expenseRatio", expense_ratio),
        ]),
    }
}

fn eda_view(s: &Snapshot, correlation: f64) -> Insight {
    let diagnosis = if correlation.abs() >= STRONG_CORRELATION {
        "Strong revenue-expense correlation: expense control drives profitability."
    } else {
        "Weak revenue-expense correlation: expenses move independently of sales."
    };
    Insight {
        summary: format!(
            "Revenue-expense correlation {:.2}, ROE {:.1}%, NPM {:.1}%.",
            correlation,
            s.roe * 100.0,
            s.npm * 100.0
        ),
        diagnosis: diagnosis.to_string(),
        solutions: "Forecast expenses against revenue drivers.".to_string(),
        profitability: format!(
            "Raise ROE to {:.1}% by optimizing capital structure.",
            s.roe * 1.15 * 100.0
        ),
        confidence: 0.9,
        metrics: BTreeMap::from([("correlation", correlation), ("roe", s.roe), ("npm", s.npm)]),
    }
}

fn competitor_view(s: &Snapshot, context: &InsightContext) -> Insight {
    let gap = INDUSTRY_SCORE - context.competitive_score;
    let diagnosis = if gap > 0.0 {
        format!("Trails the industry score by {gap:.2}.")
    } else {
        format!("Leads the industry score by {:.2}.", -gap)
    };
    let rivals = if context.competitors.is_empty() {
        "none identified".to_string()
    } else {
        context.competitors.join(", ")
    };
    let lead_rival = context
        .competitors
        .first()
        .map(String::as_str)
        .unwrap_or("key competitors");
    Insight {
        summary: format!(
            "{} score {:.2} vs industry {:.2}; competitors: {}.",
            context.company_name, context.competitive_score, INDUSTRY_SCORE, rivals
        ),
        diagnosis,
        solutions: format!("Benchmark pricing against {lead_rival}."),
        profitability: format!(
            "Each 1% of market share adds about {:.0} in revenue.",
            s.revenue * 0.01
        ),
        confidence: 0.8,
        metrics: BTreeMap::from([
            ("score", context.competitive_score),
            ("industryScore", INDUSTRY_SCORE),
            ("scoreGap", gap),
        ]),
    }
}

fn kpi_view(s: &Snapshot) -> Insight {
    let roe_side = if s.roe >= INDUSTRY_ROE { "Above" } else { "Below" };
    let liquidity = if s.current_ratio >= CURRENT_RATIO_BENCHMARK {
        "liquidity meets the benchmark"
    } else {
        "liquidity could improve"
    };
    Insight {
        summary: format!(
            "ROE {:.1}% vs industry {:.0}%, current ratio {:.2} vs {:.1}.",
            s.roe * 100.0,
            INDUSTRY_ROE * 100.0,
            s.current_ratio,
            CURRENT_RATIO_BENCHMARK
        ),
        diagnosis: format!("{roe_side}-average ROE; {liquidity}."),
        solutions: "Strengthen cash flow management.".to_string(),
        profitability: "Lift the current ratio to 1.7 for a 1% profit uplift.".to_string(),
        confidence: 0.87,
        metrics: BTreeMap::from([
            ("roe", s.roe),
            ("industryRoe", INDUSTRY_ROE),
            ("currentRatio", s.current_ratio),
        ]),
    }
}

fn ai_view(s: &Snapshot) -> Insight {
    let projected = s.net_profit * (1.0 + PROFIT_GROWTH_PROJECTION);
    Insight {
        summary: format!(
            "Projected next-period profit {:.0} at {:.1}% growth.",
            projected,
            PROFIT_GROWTH_PROJECTION * 100.0
        ),
        diagnosis: "Current trends support growth; expense volatility is the main risk."
            .to_string(),
        solutions: "Hedge currency exposure and automate cost monitoring.".to_string(),
        profitability: format!("Target {:.1}% NPM.", (s.npm + 0.012) * 100.0),
        confidence: 0.83,
        metrics: BTreeMap::from([("predictedProfit", projected), ("targetNpm", s.npm + 0.012)]),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Pearson correlation over the common prefix; 0 when undefined.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}
