//! Cell value normalization.
//!
//! [`clean`] is total: every input maps to a finite `f64`. Anything that
//! cannot be read as a number becomes `0.0`, so a malformed cell is
//! indistinguishable from a genuine zero downstream.
//!
//! Currency symbols are removed anywhere in the text; a currency code such as
//! `USD` or `Rs.` is removed from either end (`USD 99`, `1,200 USD`).

use crate::domain::workbook::Cell;

/// How a raw cell should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Currency,
    Percentage,
}

impl ValueKind {
    /// Currency unless the cell text carries a `%`.
    pub fn infer(cell: &Cell) -> Self {
        match cell {
            Cell::Text(s) if s.contains('%') => ValueKind::Percentage,
            _ => ValueKind::Currency,
        }
    }
}

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];
const CURRENCY_CODES: [&str; 7] = ["rs.", "rs", "usd", "eur", "gbp", "inr", "jpy"];

pub fn clean(raw: &Cell, kind: ValueKind) -> f64 {
    let value = match raw {
        Cell::Number(n) => *n,
        Cell::Text(s) => clean_text(s, kind),
        Cell::Empty | Cell::Date(_) => 0.0,
    };
    finite_or_zero(value)
}

pub fn clean_text(raw: &str, kind: ValueKind) -> f64 {
    let unsymboled: String = raw
        .trim()
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let unsymboled = unsymboled.trim();
    let negative =
        unsymboled.len() >= 2 && unsymboled.starts_with('(') && unsymboled.ends_with(')');
    let percent = kind == ValueKind::Percentage || unsymboled.contains('%');

    let stripped: String = unsymboled
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ',' | '%') && !c.is_whitespace())
        .collect();
    let cleaned = strip_currency_code(&stripped);

    let magnitude = if percent {
        parse_plain(cleaned) / 100.0
    } else {
        parse_scaled(cleaned)
    };

    finite_or_zero(if negative { -magnitude } else { magnitude })
}

/// Drop one leading code, then one trailing code.
fn strip_currency_code(s: &str) -> &str {
    let lower = s.to_ascii_lowercase();
    let start = CURRENCY_CODES
        .iter()
        .find(|code| lower.starts_with(*code))
        .map_or(0, |code| code.len());
    let rest = &lower[start..];
    let end = CURRENCY_CODES
        .iter()
        .find(|code| rest.ends_with(*code))
        .map_or(lower.len(), |code| lower.len() - code.len());
    &s[start..end]
}

/// Plain float, or a number followed by a single `k`/`m`/`b` unit suffix.
fn parse_scaled(s: &str) -> f64 {
    let Some(last) = s.chars().last() else {
        return 0.0;
    };
    let multiplier = match last.to_ascii_lowercase() {
        'k' => 1e3,
        'm' => 1e6,
        'b' => 1e9,
        _ => return parse_plain(s),
    };
    match s[..s.len() - 1].parse::<f64>() {
        Ok(prefix) => finite_or_zero(prefix * multiplier),
        Err(_) => 0.0,
    }
}

fn parse_plain(s: &str) -> f64 {
    s.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
