//! Month bucketing (sum) and union-axis alignment.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::series::month::MonthKey;

/// A record with a date-like field and a numeric value.
pub trait DatedValue {
    /// Raw date field, if present.
    fn date(&self) -> Option<&str>;
    /// Numeric value, if the record carries a usable one.
    fn value(&self) -> Option<f64>;
}

/// Calendar-month sums for one series.
pub type MonthlySeries = BTreeMap<MonthKey, f64>;

/// Bucket records by calendar month, summing values.
///
/// Records whose date cannot be turned into a month are dropped. A record
/// with a usable date but no usable value still opens its month (adding 0),
/// so the month shows up on the axis.
pub fn bucket_by_month<R: DatedValue>(records: &[R]) -> MonthlySeries {
    let mut buckets = MonthlySeries::new();
    let mut dropped = 0usize;

    for record in records {
        let Some(month) = record.date().and_then(MonthKey::parse) else {
            dropped += 1;
            continue;
        };
        let slot = buckets.entry(month).or_insert(0.0);
        if let Some(v) = record.value().filter(|v| v.is_finite()) {
            *slot += v;
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "records without a usable date were dropped");
    }
    buckets
}

/// Two monthly series projected onto their shared month axis.
///
/// `actual`, `forecast` and `labels` always have the same length. A `None`
/// marks a month the series has no data for (a gap, not a zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub labels: Vec<MonthKey>,
    pub actual: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Present actual values in chronological order.
    pub fn actual_values(&self) -> Vec<f64> {
        self.actual.iter().flatten().copied().collect()
    }

    /// Present forecast values in chronological order.
    pub fn forecast_values(&self) -> Vec<f64> {
        self.forecast.iter().flatten().copied().collect()
    }

    /// Iterate `(month, actual, forecast)` triples.
    pub fn rows(&self) -> impl Iterator<Item = (MonthKey, Option<f64>, Option<f64>)> + '_ {
        self.labels
            .iter()
            .zip(self.actual.iter().zip(self.forecast.iter()))
            .map(|(label, (a, f))| (*label, *a, *f))
    }
}

/// Project two monthly series onto the union of their months.
pub fn align(actual: &MonthlySeries, forecast: &MonthlySeries) -> AlignedSeries {
    let labels: Vec<MonthKey> = actual
        .keys()
        .chain(forecast.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let actual_values = labels.iter().map(|m| actual.get(m).copied()).collect();
    let forecast_values = labels.iter().map(|m| forecast.get(m).copied()).collect();

    AlignedSeries {
        labels,
        actual: actual_values,
        forecast: forecast_values,
    }
}

/// Bucket both record sequences by month and align them.
pub fn aggregate_and_align<A: DatedValue, F: DatedValue>(actual: &[A], forecast: &[F]) -> AlignedSeries {
    align(&bucket_by_month(actual), &bucket_by_month(forecast))
}
