#![allow(dead_code)]

use finsheet::domain::error::FinsheetError;
use finsheet::domain::workbook::{Cell, Sheet, Workbook};
use finsheet::ports::market_intel_port::{MarketIntelError, MarketIntelPort, Sentiment};
use finsheet::ports::workbook_port::WorkbookPort;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

pub fn t(s: &str) -> Cell {
    Cell::text(s)
}

pub fn n(v: f64) -> Cell {
    Cell::Number(v)
}

/// Income statement with a nine-row preamble, year header on row 9 and two
/// line items below it.
pub fn preamble_income_sheet() -> Sheet {
    let mut rows: Vec<Vec<Cell>> = (0..9)
        .map(|i| vec![t(&format!("Board note {i}"))])
        .collect();
    rows[0] = vec![t("Acme Holdings Ltd")];
    rows.push(vec![t("Income (line item)"), n(2021.0), n(2022.0), n(2023.0)]);
    rows.push(vec![t("Net sales"), n(100.0), n(120.0), n(140.0)]);
    rows.push(vec![t("Cost of sales"), n(40.0), n(45.0), n(50.0)]);
    Sheet::new("Income Statement", rows)
}

/// Two-period income sheet with the header on the first row.
pub fn income_sheet(name: &str, revenue: [f64; 2], expenses: [f64; 2]) -> Sheet {
    Sheet::new(
        name,
        vec![
            vec![t("Income"), n(2022.0), n(2023.0)],
            vec![t("Sales"), n(revenue[0]), n(revenue[1])],
            vec![t("Expenses"), n(expenses[0]), n(expenses[1])],
        ],
    )
}

pub fn balance_sheet(current_ratio: [f64; 2], debt_equity: [f64; 2]) -> Sheet {
    Sheet::new(
        "Balance Sheet",
        vec![
            vec![t("Particulars (INR)"), n(2022.0), n(2023.0)],
            vec![t("Current Ratio"), n(current_ratio[0]), n(current_ratio[1])],
            vec![t("Debt/Equity"), n(debt_equity[0]), n(debt_equity[1])],
        ],
    )
}

/// Workbook port answering from memory, keyed by path.
pub struct MockWorkbookPort {
    pub workbooks: HashMap<PathBuf, Workbook>,
}

impl MockWorkbookPort {
    pub fn new() -> Self {
        Self {
            workbooks: HashMap::new(),
        }
    }

    pub fn with_workbook(mut self, path: &str, workbook: Workbook) -> Self {
        self.workbooks.insert(PathBuf::from(path), workbook);
        self
    }
}

impl WorkbookPort for MockWorkbookPort {
    fn load(&self, path: &Path) -> Result<Workbook, FinsheetError> {
        self.workbooks
            .get(path)
            .cloned()
            .ok_or_else(|| FinsheetError::Workbook {
                path: path.display().to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// Market intel that sleeps before answering.
pub struct SlowIntel {
    pub delay: Duration,
}

impl MarketIntelPort for SlowIntel {
    fn competitors(&self, _company: &str) -> Result<Vec<String>, MarketIntelError> {
        thread::sleep(self.delay);
        Ok(vec!["Late Corp".to_string()])
    }

    fn sentiment(&self, _text: &str) -> Result<Sentiment, MarketIntelError> {
        thread::sleep(self.delay);
        Ok(Sentiment {
            score: 0.9,
            label: "POSITIVE".to_string(),
        })
    }
}

pub struct FailingIntel;

impl MarketIntelPort for FailingIntel {
    fn competitors(&self, _company: &str) -> Result<Vec<String>, MarketIntelError> {
        Err(MarketIntelError {
            reason: "service down".to_string(),
        })
    }

    fn sentiment(&self, _text: &str) -> Result<Sentiment, MarketIntelError> {
        Err(MarketIntelError {
            reason: "service down".to_string(),
        })
    }
}
