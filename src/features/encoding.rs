use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::models::{Category, Region};

/// Smoothed target encoder for supplier ids against the lateness label.
///
/// Training rows use leave-one-out: the row's own label is subtracted
/// before averaging, so a supplier's current outcome never leaks into its
/// own feature. Inference has no label to leave out and uses the full
/// smoothed history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEncoder {
    totals: BTreeMap<String, (f64, u32)>,
    global_rate: f64,
    smoothing: f64,
}

impl TargetEncoder {
    pub fn fit<'a, I>(rows: I, smoothing: f64) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut totals: BTreeMap<String, (f64, u32)> = BTreeMap::new();
        let mut label_sum = 0.0;
        let mut n = 0u32;
        for (supplier_id, is_late) in rows {
            let y = if is_late { 1.0 } else { 0.0 };
            let entry = totals.entry(supplier_id.to_string()).or_insert((0.0, 0));
            entry.0 += y;
            entry.1 += 1;
            label_sum += y;
            n += 1;
        }
        let global_rate = if n > 0 { label_sum / f64::from(n) } else { 0.0 };
        Self {
            totals,
            global_rate,
            smoothing,
        }
    }

    /// Leave-one-out encoding for a training row with known label.
    pub fn encode_loo(&self, supplier_id: &str, is_late: bool) -> f64 {
        let y = if is_late { 1.0 } else { 0.0 };
        match self.totals.get(supplier_id) {
            Some((sum, count)) if *count > 1 => {
                (sum - y + self.smoothing * self.global_rate)
                    / (f64::from(*count) - 1.0 + self.smoothing)
            }
            // A single-order supplier has no peers to average; fall back to
            // the smoothed prior alone.
            _ => self.global_rate,
        }
    }

    /// Full-history encoding for inference, where no label exists.
    pub fn encode(&self, supplier_id: &str) -> f64 {
        match self.totals.get(supplier_id) {
            Some((sum, count)) => {
                (sum + self.smoothing * self.global_rate) / (f64::from(*count) + self.smoothing)
            }
            None => self.global_rate,
        }
    }

    pub fn global_rate(&self) -> f64 {
        self.global_rate
    }
}

/// Appends a one-hot encoding of `category` in stable `Category::iter`
/// order.
pub fn push_category_one_hot(row: &mut Vec<f64>, category: Category) {
    for variant in Category::iter() {
        row.push(if variant == category { 1.0 } else { 0.0 });
    }
}

/// Appends a one-hot encoding of `region` in stable `Region::iter` order.
pub fn push_region_one_hot(row: &mut Vec<f64>, region: Region) {
    for variant in Region::iter() {
        row.push(if variant == region { 1.0 } else { 0.0 });
    }
}
