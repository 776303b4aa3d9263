//! Grouping of shipment durations by (month, kind).

use std::collections::BTreeMap;

use super::extract::{MonthKey, ShipmentTiming};
use super::stats::{self, DeliveryStats, StatResult};

/// Identifies one bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregationKey {
    pub month: MonthKey,
    pub kind: String,
}

impl AggregationKey {
    pub fn new(month: MonthKey, kind: impl Into<String>) -> Self {
        Self {
            month,
            kind: kind.into(),
        }
    }
}

/// Duration samples per (month, kind).
///
/// Built once per run by a single owner. Samples are only ever appended;
/// reducers see them through shared slices.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    buckets: BTreeMap<AggregationKey, Vec<f64>>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a duration to the `(month, kind)` bucket.
    pub fn push(&mut self, month: MonthKey, kind: &str, duration_days: f64) {
        self.buckets
            .entry(AggregationKey::new(month, kind))
            .or_default()
            .push(duration_days);
    }

    /// Append a shipment's duration if it has a month key.
    ///
    /// Returns whether the shipment landed in a bucket.
    pub fn record(&mut self, kind: &str, timing: &ShipmentTiming) -> bool {
        match timing.month {
            Some(month) => {
                self.push(month, kind, timing.duration_days);
                true
            }
            None => false,
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of samples across all buckets.
    pub fn sample_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: &AggregationKey) -> Option<&[f64]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Buckets in (month, kind) order.
    pub fn iter(&self) -> impl Iterator<Item = (&AggregationKey, &[f64])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Reduce every bucket to a single value.
    pub fn reduce<F>(&self, reducer: F) -> StatResult
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut result = StatResult::new();
        for (key, values) in self.iter() {
            result
                .entry(key.month)
                .or_default()
                .insert(key.kind.clone(), reducer(values));
        }
        result
    }

    /// Mean and tp90 per bucket, each from its own pass.
    pub fn statistics(&self) -> DeliveryStats {
        DeliveryStats {
            mean: self.reduce(stats::mean),
            tp90: self.reduce(stats::tp90),
        }
    }
}
