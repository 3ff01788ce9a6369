//! Cross-sheet merge.
//!
//! Sheets are applied in input order and the first sheet to supply a metric
//! owns it for the whole workbook. Reordering the inputs can change the
//! result. Short series are right-padded with zeros, so a missing period is
//! indistinguishable from a reported zero afterwards.

use crate::domain::extract::SheetProcessingResult;
use crate::domain::series::FinancialSeries;
use log::debug;

pub fn combine(results: &[SheetProcessingResult]) -> FinancialSeries {
    let mut merged = FinancialSeries::new();

    for result in results.iter().filter(|r| r.success) {
        for (metric, values) in result.partial_series.iter() {
            if merged.contains(metric) {
                debug!(
                    "{} from sheet '{}' shadowed by an earlier sheet",
                    metric, result.sheet_name
                );
                continue;
            }
            merged.insert(metric, values.to_vec());
        }
    }

    let max_len = merged.max_len();
    let metrics: Vec<_> = merged.metrics().collect();
    for metric in metrics {
        if let Some(values) = merged.entry_mut(metric) {
            values.resize(max_len, 0.0);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CanonicalMetric::*;
    use crate::domain::error::SheetExtractionError;

    fn ok(name: &str, series: FinancialSeries) -> SheetProcessingResult {
        SheetProcessingResult::succeeded(name, series)
    }

    #[test]
    fn first_sheet_wins_and_short_series_are_padded() {
        let a = ok(
            "Income Statement",
            FinancialSeries::new().with(Revenue, vec![1.0, 2.0, 3.0]),
        );
        let b = ok(
            "Financial Summary",
            FinancialSeries::new()
                .with(Revenue, vec![9.0, 9.0, 9.0])
                .with(Roe, vec![0.1]),
        );
        let merged = combine(&[a, b]);
        assert_eq!(merged.get(Revenue), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(merged.get(Roe), Some(&[0.1, 0.0, 0.0][..]));
    }

    #[test]
    fn failed_results_are_ignored() {
        let failed = SheetProcessingResult::failed(
            "Balance Sheet",
            &SheetExtractionError::Panicked("boom".into()),
        );
        let good = ok("Income Statement", FinancialSeries::new().with(Expenses, vec![4.0]));
        let merged = combine(&[failed, good]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(Expenses), Some(&[4.0][..]));
    }

    #[test]
    fn nothing_to_merge_gives_empty_series() {
        let merged = combine(&[]);
        assert!(merged.is_empty());
        assert_eq!(merged.max_len(), 0);
    }
}
