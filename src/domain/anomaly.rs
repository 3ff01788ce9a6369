//! Z-score anomaly flags over each metric's series.

use crate::domain::catalog::CanonicalMetric;
use crate::domain::series::FinancialSeries;
use serde::Serialize;

/// A point is anomalous when it lies more than this many population standard
/// deviations from its series mean.
pub const ANOMALY_Z_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyFlag {
    pub metric: CanonicalMetric,
    pub period: usize,
    pub value: f64,
    pub z_score: f64,
    pub is_anomaly: bool,
}

pub fn detect(series: &FinancialSeries) -> Vec<AnomalyFlag> {
    detect_with_threshold(series, ANOMALY_Z_THRESHOLD)
}

/// One flag per (metric, period) for every metric with at least two points,
/// metrics in series order and periods left to right.
pub fn detect_with_threshold(series: &FinancialSeries, threshold: f64) -> Vec<AnomalyFlag> {
    let mut flags = Vec::new();

    for (metric, values) in series.iter() {
        if values.len() < 2 {
            continue;
        }
        let (mean, std_dev) = mean_and_std_dev(values);
        for (period, &value) in values.iter().enumerate() {
            let z_score = if std_dev == 0.0 {
                0.0
            } else {
                (value - mean).abs() / std_dev
            };
            flags.push(AnomalyFlag {
                metric,
                period,
                value,
                z_score,
                is_anomaly: z_score > threshold,
            });
        }
    }

    flags
}

/// Population mean and standard deviation (divisor N).
fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
