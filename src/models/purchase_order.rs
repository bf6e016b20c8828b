use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A generated purchase order with its realised outcome.
///
/// `expected_delivery_date` is the business-quoted SLA
/// (`order_date + expected_lead_time_days`). `actual_lead_time_days` and
/// `is_late` are outcomes fixed at generation time; records are never
/// mutated afterwards.
///
/// Invariant: `is_late == actual_lead_time_days > expected_lead_time_days + grace`
/// where `grace` is the synthesizer's configured slack. The generator
/// verifies this before releasing a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier_id: String,
    pub order_date: NaiveDate,
    pub expected_delivery_date: NaiveDate,
    pub expected_lead_time_days: i64,
    pub quantity_ordered: u32,

    /// Units actually delivered; `None` when no goods-receipt data exists,
    /// in which case OTIF degrades to the pure on-time rate.
    pub quantity_received: Option<u32>,
    pub defect_qty: u32,

    pub actual_lead_time_days: i64,
    pub is_late: bool,
}

impl PurchaseOrder {
    /// Days beyond the quoted SLA; zero when on time.
    pub fn delay_days(&self) -> i64 {
        (self.actual_lead_time_days - self.expected_lead_time_days).max(0)
    }

    /// Whether the full ordered quantity arrived. Treats missing
    /// goods-receipt data as in-full so that OTIF falls back to the
    /// on-time rate.
    pub fn in_full(&self) -> bool {
        match self.quantity_received {
            Some(received) => received >= self.quantity_ordered,
            None => true,
        }
    }

    /// Defective fraction of the received quantity.
    pub fn defect_rate(&self) -> f64 {
        match self.quantity_received {
            Some(received) if received > 0 => f64::from(self.defect_qty) / f64::from(received),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_po() -> PurchaseOrder {
        PurchaseOrder {
            id: "PO-000001".to_string(),
            supplier_id: "SUP-0001".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            expected_delivery_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            expected_lead_time_days: 10,
            quantity_ordered: 100,
            quantity_received: Some(90),
            defect_qty: 9,
            actual_lead_time_days: 13,
            is_late: true,
        }
    }

    #[test]
    fn delay_days_clamps_at_zero() {
        let mut po = sample_po();
        assert_eq!(po.delay_days(), 3);
        po.actual_lead_time_days = 8;
        assert_eq!(po.delay_days(), 0);
    }

    #[test]
    fn in_full_requires_full_receipt() {
        let mut po = sample_po();
        assert!(!po.in_full());
        po.quantity_received = Some(100);
        assert!(po.in_full());
        po.quantity_received = None;
        assert!(po.in_full(), "missing receipt data falls back to in-full");
    }

    #[test]
    fn defect_rate_handles_missing_receipts() {
        let mut po = sample_po();
        assert!((po.defect_rate() - 0.1).abs() < 1e-12);
        po.quantity_received = None;
        assert_eq!(po.defect_rate(), 0.0);
    }
}
