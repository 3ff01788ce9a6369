//! Per-metric numeric series.

use crate::domain::catalog::CanonicalMetric;
use serde::Serialize;
use std::collections::BTreeMap;

/// Metric → values indexed by period. Iteration follows catalog order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FinancialSeries {
    series: BTreeMap<CanonicalMetric, Vec<f64>>,
}

impl FinancialSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: CanonicalMetric, values: Vec<f64>) {
        self.series.insert(metric, values);
    }

    pub fn with(mut self, metric: CanonicalMetric, values: Vec<f64>) -> Self {
        self.insert(metric, values);
        self
    }

    pub fn get(&self, metric: CanonicalMetric) -> Option<&[f64]> {
        self.series.get(&metric).map(Vec::as_slice)
    }

    pub fn contains(&self, metric: CanonicalMetric) -> bool {
        self.series.contains_key(&metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = CanonicalMetric> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalMetric, &[f64])> {
        self.series.iter().map(|(m, v)| (*m, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Length of the longest series, 0 when empty.
    pub fn max_len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Value of the most recent (right-most) period.
    pub fn latest(&self, metric: CanonicalMetric) -> Option<f64> {
        self.get(metric).and_then(|v| v.last().copied())
    }

    /// Value of the period before the most recent one.
    pub fn previous(&self, metric: CanonicalMetric) -> Option<f64> {
        self.get(metric)
            .filter(|v| v.len() >= 2)
            .map(|v| v[v.len() - 2])
    }

    pub(crate) fn entry_mut(&mut self, metric: CanonicalMetric) -> Option<&mut Vec<f64>> {
        self.series.get_mut(&metric)
    }
}
