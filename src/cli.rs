//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_workbook_adapter::FileWorkbookAdapter;
use crate::adapters::static_market_intel::StaticMarketIntel;
use crate::domain::catalog::{Derivation, MetricCatalog};
use crate::domain::config_validation::validate_settings;
use crate::domain::error::FinsheetError;
use crate::domain::extract::SheetExtractor;
use crate::domain::metadata::detect_metadata;
use crate::domain::pipeline::{AnalysisReport, Pipeline};
use crate::domain::settings::{build_settings, Settings, DEFAULT_EBITDA_REVENUE_SHARE};
use crate::domain::workbook::is_routed_sheet;
use crate::ports::workbook_port::WorkbookPort;

#[derive(Parser, Debug)]
#[command(name = "finsheet", about = "Financial workbook ingestion and metric analysis")]
pub struct Cli {
    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse a workbook and report metrics, anomalies and recommendations
    Analyze {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,
    },
    /// Show how each sheet of a workbook is routed and read
    Inspect {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List the canonical metrics and their aliases
    Catalog,
    /// Validate an analysis settings file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);
    match cli.command {
        Command::Analyze {
            file,
            config,
            output,
            json,
        } => run_analyze(&file, config.as_ref(), output.as_ref(), json),
        Command::Inspect { file } => run_inspect(&file),
        Command::Catalog => run_catalog(),
        Command::Validate { config } => run_validate(&config),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // A logger is already installed when run() is called more than once.
    if env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init()
        .is_err()
    {
        log::set_max_level(level);
    }
}

/// Settings from an INI file, or the built-in defaults when no file is given.
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings, FinsheetError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = FileConfigAdapter::from_file(path)?;
            build_settings(&adapter)
        }
        None => Ok(Settings::default()),
    }
}

fn fail(err: FinsheetError) -> ExitCode {
    eprintln!("error: {err}");
    eprintln!("{}", err.user_message());
    ExitCode::from(&err)
}

pub fn run_analyze(
    file: &Path,
    config_path: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
    json: bool,
) -> ExitCode {
    // Stage 1: settings
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    // Stage 2: workbook through the pipeline
    eprintln!("Analysing {}", file.display());
    let pipeline = Pipeline::new(settings, Arc::new(StaticMarketIntel::new()));
    let report = match pipeline.run_file(&FileWorkbookAdapter::new(), file) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    print_summary(&report);

    // Stage 3: JSON output
    if output_path.is_some() || json {
        let rendered = match serde_json::to_string_pretty(&report) {
            Ok(s) => s,
            Err(e) => return fail(e.into()),
        };
        if let Some(output) = output_path {
            if let Err(e) = fs::write(output, &rendered) {
                return fail(e.into());
            }
            eprintln!("\nReport written to: {}", output.display());
        }
        if json {
            println!("{rendered}");
        }
    }

    // Reference figures were analysed; report that through the validation status.
    match report.origin.reason() {
        Some(reason) => ExitCode::from(&FinsheetError::Validation(reason.clone())),
        None => ExitCode::SUCCESS,
    }
}

fn print_summary(report: &AnalysisReport) {
    eprintln!("\n=== Sheets ===");
    for sheet in &report.sheets {
        match &sheet.error {
            None => eprintln!("  {:<28} {} metrics", sheet.name, sheet.metrics.len()),
            Some(e) => eprintln!("  {:<28} failed: {e}", sheet.name),
        }
    }
    for name in &report.skipped_sheets {
        eprintln!("  {name:<28} skipped");
    }

    if let Some(reason) = report.origin.reason() {
        eprintln!("\nwarning: {reason}; showing reference figures");
    }

    eprintln!("\n=== Series ===");
    for (metric, values) in report.series.iter() {
        let formatted: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
        eprintln!("  {:<16} {}", metric.key(), formatted.join("  "));
    }

    let score = &report.score;
    eprintln!("\n=== Competitive Position ===");
    eprintln!("Overall:          {:.3}", score.overall);
    eprintln!("Market Share:     {:.3}", score.market_share);
    eprintln!("Revenue Growth:   {:.1}%", score.revenue_growth * 100.0);
    eprintln!("Profitability:    {:.3}", score.profitability);

    eprintln!("\n=== Anomalies ===");
    let flagged: Vec<_> = report.anomalies.iter().filter(|a| a.is_anomaly).collect();
    if flagged.is_empty() {
        eprintln!("  none");
    }
    for flag in flagged {
        eprintln!(
            "  {} period {}: {:.2} (z = {:.2})",
            flag.metric, flag.period, flag.value, flag.z_score
        );
    }

    eprintln!("\n=== Recommendations ===");
    for item in report.recommendations.items() {
        eprintln!("  - {item}");
    }
    eprintln!("Competitors:      {}", report.competitors.join(", "));
}

pub fn run_inspect(file: &Path) -> ExitCode {
    let workbook = match FileWorkbookAdapter::new().load(file) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };
    let extractor = SheetExtractor::new(MetricCatalog::standard(), DEFAULT_EBITDA_REVENUE_SHARE);

    for sheet in &workbook.sheets {
        if !is_routed_sheet(&sheet.name) {
            eprintln!("{}: skipped ({} rows)", sheet.name, sheet.height());
            continue;
        }
        let detection = detect_metadata(sheet);
        let metadata = &detection.metadata;
        eprintln!("{}: routed ({} rows)", sheet.name, sheet.height());
        eprintln!("  header row:   {}", metadata.header_row_index);
        eprintln!("  years:        {:?}", metadata.years);
        eprintln!("  in millions:  {}", metadata.is_in_millions);
        eprintln!("  currency:     {}", metadata.currency);
        for warning in &detection.warnings {
            eprintln!("  warning:      {}", warning.describe());
        }
        let result = extractor.process(sheet, metadata);
        match &result.error {
            None => {
                let found: Vec<&str> = result.partial_series.metrics().map(|m| m.key()).collect();
                eprintln!("  metrics:      {}", found.join(", "));
            }
            Some(e) => eprintln!("  failed:       {e}"),
        }
    }
    ExitCode::SUCCESS
}

pub fn run_catalog() -> ExitCode {
    for def in MetricCatalog::standard().definitions() {
        println!("{}", def.metric);
        println!("  aliases: {}", def.aliases.join(", "));
        println!("  sheets:  {}", def.sheet_tags.join(", "));
        if let Some(derivation) = def.derivation {
            println!("  derived: {}", describe_derivation(derivation));
        }
    }
    ExitCode::SUCCESS
}

fn describe_derivation(derivation: Derivation) -> String {
    match derivation {
        Derivation::ShareOfBase { base } => format!("share of {base}"),
        Derivation::Ratio {
            numerator,
            denominator,
        } => format!("{numerator} / {denominator}"),
        Derivation::MarginOver { base, subtracted } => {
            format!("({base} - {subtracted}) / {base}")
        }
    }
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match FileConfigAdapter::from_file(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    if let Err(e) = validate_settings(&adapter) {
        return fail(e);
    }
    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivations_are_described() {
        use crate::domain::catalog::CanonicalMetric::*;
        assert_eq!(
            describe_derivation(Derivation::Ratio {
                numerator: NetProfit,
                denominator: Revenue
            }),
            "netProfit / revenue"
        );
        assert_eq!(
            describe_derivation(Derivation::MarginOver {
                base: Revenue,
                subtracted: Expenses
            }),
            "(revenue - expenses) / revenue"
        );
    }

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "finsheet", "-v", "analyze", "--file", "q3.xlsx", "--json", "-o", "out.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Analyze {
                file,
                output,
                json,
                config,
            } => {
                assert_eq!(file, PathBuf::from("q3.xlsx"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert!(json);
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_raises_log_level() {
        init_logging(false);
        assert_eq!(log::max_level(), LevelFilter::Warn);
        init_logging(true);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        assert!(log::log_enabled!(log::Level::Debug));
    }

    #[test]
    fn default_settings_when_no_config() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }
}
