//! Canonical metric registry.
//!
//! Every raw row label is mapped onto one of a closed set of
//! [`CanonicalMetric`]s. Alias matching is exact, case-sensitive equality on
//! the trimmed label; "Net Sales" and "net sales" are different aliases.
//! A sheet is eligible for a metric when its name contains one of the
//! metric's sheet tags (case-insensitive substring).

use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalMetric {
    Revenue,
    Expenses,
    NetProfit,
    CashFlow,
    Ebitda,
    Pat,
    DebtEquityRatio,
    Npm,
    CurrentRatio,
    Roe,
    Roce,
    GrossMargin,
    OperatingMargin,
}

impl CanonicalMetric {
    pub const ALL: [CanonicalMetric; 13] = [
        CanonicalMetric::Revenue,
        CanonicalMetric::Expenses,
        CanonicalMetric::NetProfit,
        CanonicalMetric::CashFlow,
        CanonicalMetric::Ebitda,
        CanonicalMetric::Pat,
        CanonicalMetric::DebtEquityRatio,
        CanonicalMetric::Npm,
        CanonicalMetric::CurrentRatio,
        CanonicalMetric::Roe,
        CanonicalMetric::Roce,
        CanonicalMetric::GrossMargin,
        CanonicalMetric::OperatingMargin,
    ];

    /// Stable camelCase key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            CanonicalMetric::Revenue => "revenue",
            CanonicalMetric::Expenses => "expenses",
            CanonicalMetric::NetProfit => "netProfit",
            CanonicalMetric::CashFlow => "cashFlow",
            CanonicalMetric::Ebitda => "ebitda",
            CanonicalMetric::Pat => "pat",
            CanonicalMetric::DebtEquityRatio => "debtEquityRatio",
            CanonicalMetric::Npm => "npm",
            CanonicalMetric::CurrentRatio => "currentRatio",
            CanonicalMetric::Roe => "roe",
            CanonicalMetric::Roce => "roce",
            CanonicalMetric::GrossMargin => "grossMargin",
            CanonicalMetric::OperatingMargin => "operatingMargin",
        }
    }

    /// Parse a metric key. Accepts the camelCase key or its snake_case form.
    pub fn from_key(key: &str) -> Option<Self> {
        let wanted: String = key.trim().chars().filter(|c| *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(&wanted))
    }
}

impl fmt::Display for CanonicalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Rule for computing a metric when no alias row is present on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    /// `base × share`, where the share comes from settings (EBITDA ≈ 20% of revenue).
    ShareOfBase { base: CanonicalMetric },
    /// `numerator / denominator` per period.
    Ratio {
        numerator: CanonicalMetric,
        denominator: CanonicalMetric,
    },
    /// `(base − subtracted) / base` per period.
    MarginOver {
        base: CanonicalMetric,
        subtracted: CanonicalMetric,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub metric: CanonicalMetric,
    /// Accepted row labels, in tie-break order.
    pub aliases: &'static [&'static str],
    /// Lower-case sheet-name fragments that make a sheet eligible.
    pub sheet_tags: &'static [&'static str],
    pub derivation: Option<Derivation>,
}

const INCOME_TAGS: &[&str] = &["income", "profit", "p&l", "summary", "consolidated statements"];
const BALANCE_TAGS: &[&str] = &["balance", "summary", "ratio"];
const CASH_TAGS: &[&str] = &["cash flow", "summary"];
const MARGIN_TAGS: &[&str] = &["income", "profit", "summary", "ratio"];

/// Immutable, process-wide catalog.
#[derive(Debug)]
pub struct MetricCatalog {
    definitions: Vec<MetricDefinition>,
}

static STANDARD_CATALOG: OnceLock<MetricCatalog> = OnceLock::new();

impl MetricCatalog {
    /// The built-in catalog, constructed on first use and never mutated.
    pub fn standard() -> &'static MetricCatalog {
        STANDARD_CATALOG.get_or_init(|| MetricCatalog::new(standard_definitions()))
    }

    pub fn new(definitions: Vec<MetricDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    pub fn definition(&self, metric: CanonicalMetric) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|d| d.metric == metric)
    }

    /// Whether the sheet name qualifies for the metric.
    pub fn sheet_qualifies(&self, sheet_name: &str, metric: CanonicalMetric) -> bool {
        let lower = sheet_name.to_lowercase();
        self.definition(metric)
            .is_some_and(|d| d.sheet_tags.iter().any(|tag| lower.contains(tag)))
    }

    /// Definitions eligible for a sheet, in catalog order.
    pub fn eligible_for<'a>(&'a self, sheet_name: &str) -> Vec<&'a MetricDefinition> {
        self.definitions
            .iter()
            .filter(|d| self.sheet_qualifies(sheet_name, d.metric))
            .collect()
    }

    /// Metrics whose alias set contains `label` exactly.
    pub fn metrics_for_label(&self, label: &str) -> Vec<CanonicalMetric> {
        self.definitions
            .iter()
            .filter(|d| d.aliases.iter().any(|alias| *alias == label))
            .map(|d| d.metric)
            .collect()
    }
}

fn standard_definitions() -> Vec<MetricDefinition> {
    use CanonicalMetric::*;
    vec![
        MetricDefinition {
            metric: Revenue,
            aliases: &[
                "Revenue",
                "Net sales",
                "Net Sales",
                "Sales",
                "Total Revenue",
                "Revenue from operations",
                "Revenue from Operations",
            ],
            sheet_tags: INCOME_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: Expenses,
            aliases: &[
                "Expenses",
                "Total Expenses",
                "Total expenses",
                "Cost of sales",
                "Cost of Sales",
                "Operating Expenses",
                "Expenditure",
            ],
            sheet_tags: INCOME_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: NetProfit,
            aliases: &["Net Profit", "Net profit", "Net Income", "Net income"],
            sheet_tags: INCOME_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: CashFlow,
            aliases: &[
                "Cash Flow",
                "Net Cash Flow",
                "Net cash flow",
                "Cash from Operating Activity",
                "Net cash from operating activities",
            ],
            sheet_tags: CASH_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: Ebitda,
            aliases: &["EBITDA", "Operating Profit", "Operating profit"],
            sheet_tags: INCOME_TAGS,
            derivation: Some(Derivation::ShareOfBase { base: Revenue }),
        },
        MetricDefinition {
            metric: Pat,
            aliases: &["PAT", "Profit after tax", "Profit After Tax"],
            sheet_tags: INCOME_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: DebtEquityRatio,
            aliases: &["Debt/Equity Ratio", "Debt to Equity", "Debt/Equity", "D/E"],
            sheet_tags: BALANCE_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: Npm,
            aliases: &["NPM", "Net Profit Margin", "NPM %"],
            sheet_tags: MARGIN_TAGS,
            derivation: Some(Derivation::Ratio {
                numerator: NetProfit,
                denominator: Revenue,
            }),
        },
        MetricDefinition {
            metric: CurrentRatio,
            aliases: &["Current Ratio", "Current ratio"],
            sheet_tags: BALANCE_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: Roe,
            aliases: &["ROE", "Return on Equity", "ROE %"],
            sheet_tags: BALANCE_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: Roce,
            aliases: &["ROCE", "Return on Capital Employed", "ROCE %"],
            sheet_tags: BALANCE_TAGS,
            derivation: None,
        },
        MetricDefinition {
            metric: GrossMargin,
            aliases: &["Gross Margin", "Gross margin", "Gross Margin %"],
            sheet_tags: MARGIN_TAGS,
            derivation: Some(Derivation::MarginOver {
                base: Revenue,
                subtracted: Expenses,
            }),
        },
        MetricDefinition {
            metric: OperatingMargin,
            aliases: &["Operating Margin", "OPM", "OPM %"],
            sheet_tags: MARGIN_TAGS,
            derivation: Some(Derivation::Ratio {
                numerator: Ebitda,
                denominator: Revenue,
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_metric_once() {
        let catalog = MetricCatalog::standard();
        for metric in CanonicalMetric::ALL {
            let count = catalog
                .definitions()
                .iter()
                .filter(|d| d.metric == metric)
                .count();
            assert_eq!(count, 1, "{metric} defined {count} times");
        }
    }

    #[test]
    fn alias_matching_is_case_sensitive() {
        let catalog = MetricCatalog::standard();
        assert_eq!(catalog.metrics_for_label("Net sales"), vec![CanonicalMetric::Revenue]);
        assert!(catalog.metrics_for_label("NET SALES").is_empty());
        assert!(catalog.metrics_for_label("revenue").is_empty());
    }

    #[test]
    fn sheet_eligibility_uses_tags() {
        let catalog = MetricCatalog::standard();
        assert!(catalog.sheet_qualifies("Income Statement", CanonicalMetric::Revenue));
        assert!(!catalog.sheet_qualifies("Balance Sheet", CanonicalMetric::Revenue));
        assert!(catalog.sheet_qualifies("Balance Sheet", CanonicalMetric::CurrentRatio));
        assert!(catalog.sheet_qualifies("Cash Flows", CanonicalMetric::CashFlow));
        assert!(catalog.sheet_qualifies("Financial Summary", CanonicalMetric::CashFlow));
    }

    #[test]
    fn metric_keys_round_trip() {
        for metric in CanonicalMetric::ALL {
            assert_eq!(CanonicalMetric::from_key(metric.key()), Some(metric));
        }
        assert_eq!(
            CanonicalMetric::from_key("debt_equity_ratio"),
            Some(CanonicalMetric::DebtEquityRatio)
        );
        assert_eq!(CanonicalMetric::from_key("margin"), None);
    }
}
