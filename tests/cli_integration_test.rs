//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Settings loading from real INI files on disk
//! - `validate` against valid and invalid configs
//! - `analyze` over CSV workbooks, including JSON output and the
//!   reference-fallback exit status
//! - `inspect` and `catalog`

use finsheet::adapters::file_config_adapter::FileConfigAdapter;
use finsheet::cli::{self, Cli};
use finsheet::domain::catalog::CanonicalMetric;
use finsheet::domain::error::FinsheetError;
use finsheet::domain::settings::{build_settings, Settings};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

fn write_temp_file(suffix: &str, prefix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    write_temp_file(".ini", "finsheet_", content)
}

// ExitCode doesn't implement PartialEq, so compare via its Debug output.
fn status(code: ExitCode) -> String {
    format!("{code:?}")
}

fn success() -> String {
    status(ExitCode::SUCCESS)
}

const VALID_INI: &str = r#"
[market]
company_name = Acme Holdings
total_market_size = 500000
innovation = 0.6
brand_strength = 0.4

[scoring]
weight_market_share = 0.25
weight_revenue_growth = 0.25
weight_profitability = 0.20
weight_innovation = 0.15
weight_brand_strength = 0.15
benchmark_npm = 0.12

[recommendations]
max_debt_equity = 1.5
min_npm = 0.08
min_current_ratio = 1.2

[validation]
required_metrics = revenue, net_profit

[heuristics]
ebitda_revenue_share = 0.25
cost_reduction_target = 0.07

[intel]
timeout_ms = 250
"#;

const INCOME_CSV: &str = "\
Acme Holdings (USD in millions),,
Income,2022,2023
Sales,\"1,000\",\"1,200\"
Expenses,600,700
Net Profit,80,96
";

mod settings_loading {
    use super::*;

    #[test]
    fn full_ini_builds_settings() {
        let file = write_temp_ini(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let settings = build_settings(&adapter).unwrap();

        assert_eq!(settings.market.company_name, "Acme Holdings");
        assert_eq!(settings.market.total_market_size, 500000.0);
        assert_eq!(settings.score.weights.market_share, 0.25);
        assert_eq!(settings.score.benchmark_npm, 0.12);
        assert_eq!(settings.thresholds.max_debt_equity, 1.5);
        assert_eq!(
            settings.required_metrics,
            vec![CanonicalMetric::Revenue, CanonicalMetric::NetProfit]
        );
        assert_eq!(settings.ebitda_revenue_share, 0.25);
        assert_eq!(settings.cost_reduction_target, 0.07);
        assert_eq!(settings.intel_timeout, Duration::from_millis(250));
    }

    #[test]
    fn empty_ini_uses_defaults() {
        let file = write_temp_ini("[market]\n");
        let settings = cli::load_settings(Some(&PathBuf::from(file.path()))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let path = PathBuf::from("/nonexistent/path/finsheet.ini");
        let err = cli::load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, FinsheetError::ConfigParse { .. }));
    }

    #[test]
    fn unnormalized_weights_are_rejected() {
        let file = write_temp_ini("[scoring]\nweight_market_share = 0.9\n");
        let err = cli::load_settings(Some(&PathBuf::from(file.path()))).unwrap_err();
        match err {
            FinsheetError::ConfigInvalid { key, .. } => assert_eq!(key, "weight_market_share"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        let code = cli::run_validate(&PathBuf::from(file.path()));
        assert_eq!(status(code), success());
    }

    #[test]
    fn invalid_value_exits_with_config_status() {
        let file = write_temp_ini("[market]\ninnovation = 1.5\n");
        let code = cli::run_validate(&PathBuf::from(file.path()));
        assert_eq!(status(code), status(ExitCode::from(2)));
    }

    #[test]
    fn unknown_required_metric_fails() {
        let file = write_temp_ini("[validation]\nrequired_metrics = revenue, margin\n");
        let code = cli::run_validate(&PathBuf::from(file.path()));
        assert_ne!(status(code), success());
    }
}

mod analyze_command {
    use super::*;

    #[test]
    fn csv_analysis_writes_json_report() {
        let csv = write_temp_file(".csv", "income_statement_", INCOME_CSV);
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.json");

        let code = cli::run_analyze(csv.path(), None, Some(&output), false);
        assert_eq!(status(code), success());
        assert!(output.exists(), "report file should be written");

        let content = std::fs::read_to_string(&output).unwrap();
        let report: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(report["origin"]["source"], "workbook");
        assert_eq!(report["series"]["revenue"][1], 1200.0);
        assert_eq!(report["competitors"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn configured_analysis_uses_settings() {
        let csv = write_temp_file(".csv", "income_statement_", INCOME_CSV);
        let ini = write_temp_ini(VALID_INI);
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.json");

        let config = PathBuf::from(ini.path());
        let code = cli::run_analyze(csv.path(), Some(&config), Some(&output), false);
        assert_eq!(status(code), success());

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        // EBITDA derived at 25% of revenue.
        assert_eq!(report["series"]["ebitda"][1], 300.0);
        assert!(report["insights"]["financial"]["summary"].is_string());
    }

    #[test]
    fn unusable_workbook_exits_with_fallback_status() {
        let csv = write_temp_file(".csv", "income_statement_", "Sales,FY A,FY B\nExpenses,1,2\n");
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.json");

        let code = cli::run_analyze(csv.path(), None, Some(&output), false);
        assert_eq!(status(code), status(ExitCode::from(3)));

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["origin"]["source"], "reference");
        assert_eq!(report["origin"]["reason"]["kind"], "noUsableMetrics");
        assert_eq!(report["series"]["revenue"][0], 19457.0);
    }

    #[test]
    fn unreadable_workbook_fails() {
        let path = PathBuf::from("/nonexistent/q3.csv");
        let code = cli::run_analyze(&path, None, None, false);
        assert_eq!(status(code), status(ExitCode::from(1)));
    }

    #[test]
    fn bad_config_stops_before_reading_workbook() {
        let csv = write_temp_file(".csv", "income_statement_", INCOME_CSV);
        let ini = write_temp_ini("[market]\ntotal_market_size = -5\n");
        let config = PathBuf::from(ini.path());
        let code = cli::run_analyze(csv.path(), Some(&config), None, false);
        assert_eq!(status(code), status(ExitCode::from(2)));
    }
}

mod other_commands {
    use super::*;
    use clap::Parser;

    #[test]
    fn inspect_reads_csv() {
        let csv = write_temp_file(
            ".csv",
            "balance_sheet_",
            "Item,2022,2023\nCurrent Ratio,1.1,1.3\n",
        );
        assert_eq!(status(cli::run_inspect(csv.path())), success());
    }

    #[test]
    fn inspect_missing_file_fails() {
        let code = cli::run_inspect(&PathBuf::from("/nonexistent/figures.xlsx"));
        assert_ne!(status(code), success());
    }

    #[test]
    fn catalog_lists_metrics() {
        assert_eq!(status(cli::run_catalog()), success());
    }

    #[test]
    fn run_dispatches_parsed_commands() {
        let cli = Cli::try_parse_from(["finsheet", "catalog"]).unwrap();
        assert_eq!(status(cli::run(cli)), success());
    }
}
