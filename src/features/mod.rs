//! Feature engineering with a strict no-leakage rule.
//!
//! Every feature for a PO is computed only from information available
//! before that PO's outcome is known: rolling supplier statistics use
//! strictly-prior orders, and the supplier target encoding is leave-one-out
//! for training rows. Held-out rows are featurized through the label-free
//! path serving uses, with an encoder that has never seen their labels.

pub mod encoding;

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ColdStartDefaults, ModelConfig};
use crate::errors::ServiceError;
use crate::ml::Split;
use crate::models::{Category, PurchaseOrder, Region};
use crate::synth::Dataset;

pub use encoding::TargetEncoder;

/// Stable ordering of the numeric feature columns. One-hot category and
/// region columns follow in `Category::iter`/`Region::iter` order.
pub const NUMERIC_FEATURES: &[&str] = &[
    "expected_lead_time",
    "quantity_ordered",
    "base_price",
    "order_day_of_week",
    "order_month",
    "order_quarter",
    "supplier_avg_lt",
    "supplier_late_rate",
    "supplier_late_severity",
    "supplier_defect_rate",
    "supplier_te",
];

/// Rolling supplier statistics as of a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplierSnapshot {
    pub avg_lead_time_days: f64,
    pub late_rate: f64,
    pub late_severity_days: f64,
    pub defect_rate: f64,
    pub observed_orders: u32,
}

impl SupplierSnapshot {
    fn from_cold_start(defaults: &ColdStartDefaults) -> Self {
        Self {
            avg_lead_time_days: defaults.avg_lead_time_days,
            late_rate: defaults.late_rate,
            late_severity_days: defaults.late_severity_days,
            defect_rate: defaults.defect_rate,
            observed_orders: 0,
        }
    }
}

/// Per-supplier outcome history, ordered chronologically, supporting
/// as-of-date rolling statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierHistory {
    // (order_date, actual_lead_time, is_late, delay_days, defect_rate)
    outcomes: BTreeMap<String, Vec<(NaiveDate, i64, bool, i64, f64)>>,
}

impl SupplierHistory {
    pub fn from_orders(orders: &[PurchaseOrder]) -> Self {
        let mut outcomes: BTreeMap<String, Vec<(NaiveDate, i64, bool, i64, f64)>> =
            BTreeMap::new();
        for po in orders {
            outcomes.entry(po.supplier_id.clone()).or_default().push((
                po.order_date,
                po.actual_lead_time_days,
                po.is_late,
                po.delay_days(),
                po.defect_rate(),
            ));
        }
        for series in outcomes.values_mut() {
            series.sort_by_key(|(date, ..)| *date);
        }
        Self { outcomes }
    }

    /// Statistics over the supplier's orders with `order_date` strictly
    /// before `as_of`. Returns the documented cold-start defaults when no
    /// prior order exists.
    pub fn stats_before(
        &self,
        supplier_id: &str,
        as_of: NaiveDate,
        cold_start: &ColdStartDefaults,
    ) -> SupplierSnapshot {
        let prior: Vec<_> = self
            .outcomes
            .get(supplier_id)
            .map(|series| {
                series
                    .iter()
                    .take_while(|(date, ..)| *date < as_of)
                    .collect()
            })
            .unwrap_or_default();

        if prior.is_empty() {
            return SupplierSnapshot::from_cold_start(cold_start);
        }

        let n = prior.len() as f64;
        SupplierSnapshot {
            avg_lead_time_days: prior.iter().map(|(_, lt, ..)| *lt as f64).sum::<f64>() / n,
            late_rate: prior.iter().filter(|(_, _, late, ..)| *late).count() as f64 / n,
            late_severity_days: prior.iter().map(|(.., delay, _)| *delay as f64).sum::<f64>() / n,
            defect_rate: prior.iter().map(|(.., rate)| *rate).sum::<f64>() / n,
            observed_orders: prior.len() as u32,
        }
    }

    /// Statistics over the supplier's full recorded history; used at
    /// inference where every recorded order is in the past.
    pub fn stats_full(
        &self,
        supplier_id: &str,
        cold_start: &ColdStartDefaults,
    ) -> SupplierSnapshot {
        self.stats_before(supplier_id, NaiveDate::MAX, cold_start)
    }
}

/// One model-ready row with its labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub po_id: String,
    pub values: Vec<f64>,
    pub lead_time_label: f64,
    pub late_label: bool,
}

/// The full feature table plus everything needed to featurize unseen POs
/// consistently with training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    pub rows: Vec<FeatureRow>,
    pub feature_names: Vec<String>,
    pub encoder: TargetEncoder,
    pub history: SupplierHistory,
    pub cold_start: ColdStartDefaults,
}

/// Raw attributes of a not-yet-delivered PO submitted for prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoRequest {
    pub supplier_id: String,
    pub order_date: NaiveDate,
    pub expected_delivery_date: NaiveDate,
    pub quantity_ordered: u32,
}

pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Featurizes a generated dataset. The target encoder is fitted on the
    /// training rows of `split` only; held-out rows receive the same
    /// label-free encoding serving uses, so held-out metrics measure what
    /// the serving path will actually see.
    pub fn build(
        dataset: &Dataset,
        split: &Split,
        cold_start: &ColdStartDefaults,
        model_cfg: &ModelConfig,
    ) -> Result<FeatureSet, ServiceError> {
        let n = dataset.purchase_orders.len();
        if split.train.len() + split.test.len() != n {
            return Err(ServiceError::InvalidOperation(format!(
                "split covers {} rows but the dataset has {}",
                split.train.len() + split.test.len(),
                n
            )));
        }
        let mut in_train = vec![false; n];
        for &i in &split.train {
            in_train[i] = true;
        }

        let history = SupplierHistory::from_orders(&dataset.purchase_orders);
        let encoder = TargetEncoder::fit(
            split.train.iter().map(|&i| {
                let po = &dataset.purchase_orders[i];
                (po.supplier_id.as_str(), po.is_late)
            }),
            model_cfg.te_smoothing,
        );

        let mut rows = Vec::with_capacity(n);
        for (i, po) in dataset.purchase_orders.iter().enumerate() {
            let supplier = dataset.supplier(&po.supplier_id)?;
            let snapshot = history.stats_before(&po.supplier_id, po.order_date, cold_start);
            let te = if in_train[i] {
                encoder.encode_loo(&po.supplier_id, po.is_late)
            } else {
                encoder.encode(&po.supplier_id)
            };

            let values = assemble_row(
                po.expected_lead_time_days,
                po.quantity_ordered,
                supplier.base_price,
                po.order_date,
                supplier.category,
                supplier.region,
                &snapshot,
                te,
            );
            rows.push(FeatureRow {
                po_id: po.id.clone(),
                values,
                lead_time_label: po.actual_lead_time_days as f64,
                late_label: po.is_late,
            });
        }

        debug!(rows = rows.len(), "feature table built");
        Ok(FeatureSet {
            rows,
            feature_names: feature_names(),
            encoder,
            history,
            cold_start: *cold_start,
        })
    }
}

impl FeatureSet {
    /// Featurizes an unseen PO with the fitted encoder and full supplier
    /// history. The category/region schema is identical to training.
    pub fn featurize_request(
        &self,
        request: &PoRequest,
        category: Category,
        region: Region,
        base_price: f64,
    ) -> Result<Vec<f64>, ServiceError> {
        let expected = (request.expected_delivery_date - request.order_date).num_days();
        if expected <= 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "expected delivery date {} is not after order date {}",
                request.expected_delivery_date, request.order_date
            )));
        }
        let snapshot = self.history.stats_full(&request.supplier_id, &self.cold_start);
        let te = self.encoder.encode(&request.supplier_id);
        Ok(assemble_row(
            expected,
            request.quantity_ordered,
            base_price,
            request.order_date,
            category,
            region,
            &snapshot,
            te,
        ))
    }
}

fn feature_names() -> Vec<String> {
    use strum::IntoEnumIterator;
    let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
    names.extend(Category::iter().map(|c| format!("category_{c}")));
    names.extend(Region::iter().map(|r| format!("region_{r}")));
    names
}

#[allow(clippy::too_many_arguments)]
fn assemble_row(
    expected_lead_time_days: i64,
    quantity_ordered: u32,
    base_price: f64,
    order_date: NaiveDate,
    category: Category,
    region: Region,
    snapshot: &SupplierSnapshot,
    te: f64,
) -> Vec<f64> {
    let mut row = vec![
        expected_lead_time_days as f64,
        f64::from(quantity_ordered),
        base_price,
        f64::from(order_date.weekday().num_days_from_monday()),
        f64::from(order_date.month()),
        f64::from((order_date.month() - 1) / 3 + 1),
        snapshot.avg_lead_time_days,
        snapshot.late_rate,
        snapshot.late_severity_days,
        snapshot.defect_rate,
        te,
    ];
    encoding::push_category_one_hot(&mut row, category);
    encoding::push_region_one_hot(&mut row, region);
    row
}
