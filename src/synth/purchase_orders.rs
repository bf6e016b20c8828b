use chrono::Duration;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::errors::ServiceError;
use crate::models::{Category, PurchaseOrder, Supplier};

/// Extra mean delay in days attached to the product category itself,
/// independent of supplier or region. Personal Care carries the longest
/// processing tail; Beverage ships slightly ahead of quote.
fn category_bias(category: Category) -> f64 {
    match category {
        Category::Food => 0.0,
        Category::Beverage => -0.2,
        Category::Household => 0.3,
        Category::PersonalCare => 0.8,
    }
}

/// Generates purchase orders against a fixed supplier population.
///
/// The realised lead time is the quoted baseline plus a reliability-driven
/// mean shift and Gaussian noise whose spread also widens as reliability
/// drops. Lateness is always derived from the lead-time comparison, so the
/// `is_late`/`actual_lead_time_days` invariant holds by construction; the
/// consistency pass below guards regressions anyway.
pub struct PoSynthesizer;

impl PoSynthesizer {
    pub fn generate(
        rng: &mut StdRng,
        suppliers: &[Supplier],
        cfg: &GenerationConfig,
    ) -> Result<Vec<PurchaseOrder>, ServiceError> {
        if suppliers.is_empty() {
            return Err(ServiceError::Generation(
                "cannot synthesize purchase orders without suppliers".to_string(),
            ));
        }

        let window_days = (cfg.window_end - cfg.window_start).num_days();
        let mut orders = Vec::with_capacity(cfg.po_count as usize);

        for i in 0..cfg.po_count {
            let supplier = &suppliers[rng.gen_range(0..suppliers.len())];
            let order_date = cfg.window_start + Duration::days(rng.gen_range(0..=window_days));

            let baseline = cfg
                .baselines
                .lookup(supplier.category, supplier.region)?;
            let expected = baseline.baseline_days;

            let unreliability = 1.0 - supplier.reliability;
            let mean_shift = cfg.delay_scale * unreliability - cfg.on_time_margin;
            let sigma = baseline.noise_scale * (1.0 + unreliability * cfg.variance_factor);
            let noise = Normal::new(0.0, sigma)
                .map_err(|e| ServiceError::Generation(format!("normal(0, {sigma}): {e}")))?
                .sample(rng);

            // Lead time cannot drop below one day.
            let actual = ((expected as f64 + mean_shift + category_bias(supplier.category)
                + noise)
                .round() as i64)
                .max(1);
            let is_late = actual > expected + cfg.grace_days;

            let quantity_ordered: u32 = rng.gen_range(cfg.quantity_min..=cfg.quantity_max);
            let short_ship_p = cfg.short_ship_base + cfg.short_ship_scale * unreliability;
            let quantity_received = if rng.gen::<f64>() < short_ship_p {
                (f64::from(quantity_ordered) * rng.gen_range(0.6..1.0)).round() as u32
            } else {
                quantity_ordered
            };
            let defect_fraction = rng.gen::<f64>() * (cfg.defect_base + cfg.defect_scale * unreliability);
            let defect_qty =
                ((f64::from(quantity_received) * defect_fraction).round() as u32).min(quantity_received);

            orders.push(PurchaseOrder {
                id: format!("PO-{:06}", i + 1),
                supplier_id: supplier.id.clone(),
                order_date,
                expected_delivery_date: order_date + Duration::days(expected),
                expected_lead_time_days: expected,
                quantity_ordered,
                quantity_received: Some(quantity_received),
                defect_qty,
                actual_lead_time_days: actual,
                is_late,
            });
        }

        verify_consistency(&orders, cfg)?;
        debug!(count = orders.len(), "synthesized purchase orders");
        Ok(orders)
    }
}

/// Internal consistency check run before a dataset is released. A failure
/// here is a generation bug, never model input.
pub fn verify_consistency(
    orders: &[PurchaseOrder],
    cfg: &GenerationConfig,
) -> Result<(), ServiceError> {
    for po in orders {
        let should_be_late = po.actual_lead_time_days > po.expected_lead_time_days + cfg.grace_days;
        if po.is_late != should_be_late {
            return Err(ServiceError::Generation(format!(
                "{}: is_late={} contradicts actual={} vs expected={} (grace {})",
                po.id, po.is_late, po.actual_lead_time_days, po.expected_lead_time_days, cfg.grace_days
            )));
        }
        if po.actual_lead_time_days < 1 {
            return Err(ServiceError::Generation(format!(
                "{}: non-positive lead time {}",
                po.id, po.actual_lead_time_days
            )));
        }
        if po.order_date < cfg.window_start || po.order_date > cfg.window_end {
            return Err(ServiceError::Generation(format!(
                "{}: order date {} outside configured window",
                po.id, po.order_date
            )));
        }
        if let Some(received) = po.quantity_received {
            if received > po.quantity_ordered || po.defect_qty > received {
                return Err(ServiceError::Generation(format!(
                    "{}: fulfilment quantities are inconsistent",
                    po.id
                )));
            }
        }
        if (po.expected_delivery_date - po.order_date).num_days() != po.expected_lead_time_days {
            return Err(ServiceError::Generation(format!(
                "{}: expected delivery date disagrees with quoted lead time",
                po.id
            )));
        }
    }
    Ok(())
}
