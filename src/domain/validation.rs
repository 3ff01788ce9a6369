//! Dataset validity check and reference-dataset fallback.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::error::ValidationFailure;
use crate::domain::series::FinancialSeries;
use serde::Serialize;

/// Where the dataset in a report came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum DatasetOrigin {
    Workbook,
    Reference { reason: ValidationFailure },
}

impl DatasetOrigin {
    pub fn is_reference(&self) -> bool {
        matches!(self, DatasetOrigin::Reference { .. })
    }

    pub fn reason(&self) -> Option<&ValidationFailure> {
        match self {
            DatasetOrigin::Workbook => None,
            DatasetOrigin::Reference { reason } => Some(reason),
        }
    }
}

/// A dataset is valid when it has at least one period and every required
/// metric is present with only finite values.
pub fn validate_dataset(
    series: &FinancialSeries,
    required: &[CanonicalMetric],
) -> Result<(), ValidationFailure> {
    if series.max_len() == 0 {
        return Err(ValidationFailure::NoUsableMetrics);
    }

    let missing: Vec<CanonicalMetric> = required
        .iter()
        .copied()
        .filter(|m| !series.contains(*m))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::MissingRequired { metrics: missing });
    }

    for &metric in required {
        if let Some(values) = series.get(metric)
            && values.iter().any(|v| !v.is_finite())
        {
            return Err(ValidationFailure::NonNumeric { metric });
        }
    }

    Ok(())
}

/// Single-period dataset shown when an upload yields nothing usable.
pub fn reference_dataset() -> FinancialSeries {
    use CanonicalMetric::*;
    FinancialSeries::new()
        .with(Revenue, vec![19457.0])
        .with(Expenses, vec![8131.0])
        .with(NetProfit, vec![2300.0])
        .with(Ebitda, vec![3992.0])
        .with(DebtEquityRatio, vec![0.94])
        .with(Npm, vec![0.118])
        .with(Roe, vec![0.14])
        .with(CurrentRatio, vec![1.59])
}

/// The merged dataset when it is valid, otherwise the reference dataset.
pub fn resolve_dataset(
    merged: FinancialSeries,
    required: &[CanonicalMetric],
) -> (FinancialSeries, DatasetOrigin) {
    match validate_dataset(&merged, required) {
        Ok(()) => (merged, DatasetOrigin::Workbook),
        Err(reason) => {
            log::warn!("using reference dataset: {reason}");
            (reference_dataset(), DatasetOrigin::Reference { reason })
        }
    }
}
