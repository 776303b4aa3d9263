//! Reducers over per-bucket duration samples.

use std::collections::BTreeMap;

use serde::Serialize;

use super::extract::MonthKey;

/// Percentile reported as tp90.
pub const TP90: f64 = 0.9;

/// One statistic per bucket, keyed month -> kind.
pub type StatResult = BTreeMap<MonthKey, BTreeMap<String, f64>>;

/// Both statistics produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeliveryStats {
    pub mean: StatResult,
    pub tp90: StatResult,
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 90th percentile by nearest rank.
pub fn tp90(values: &[f64]) -> f64 {
    nearest_rank(values, TP90)
}

/// Nearest-rank percentile: the element at `ceil(pct * n) - 1` of the
/// ascending order, without interpolation.
///
/// `pct` is a fraction in `[0, 1]`. Works on a sorted copy so `values` keeps
/// its order. Returns `0.0` for an empty slice.
pub fn nearest_rank(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct * sorted.len() as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[index]
}
