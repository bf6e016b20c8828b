use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, PurchaseOrder, Region};
use crate::synth::Dataset;

/// Inclusive date window an OTIF query runs over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// On-Time-In-Full aggregation over historical purchase orders.
///
/// A PO counts toward OTIF when it was not late and the received quantity
/// covers the ordered quantity. POs without goods-receipt data count as
/// in-full, so OTIF reduces to the on-time rate when fulfilment data is
/// absent.
pub struct OtifCalculator<'a> {
    dataset: &'a Dataset,
}

impl<'a> OtifCalculator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    fn rate<F>(&self, window: DateWindow, filter: F) -> Option<f64>
    where
        F: Fn(&PurchaseOrder) -> bool,
    {
        let in_scope: Vec<&PurchaseOrder> = self
            .dataset
            .purchase_orders
            .iter()
            .filter(|po| window.contains(po.order_date) && filter(po))
            .collect();
        if in_scope.is_empty() {
            return None;
        }
        let hits = in_scope.iter().filter(|po| !po.is_late && po.in_full()).count();
        Some(hits as f64 / in_scope.len() as f64)
    }

    /// OTIF across every PO in the window; `None` when the window is empty.
    pub fn overall(&self, window: DateWindow) -> Option<f64> {
        self.rate(window, |_| true)
    }

    pub fn for_supplier(&self, supplier_id: &str, window: DateWindow) -> Option<f64> {
        self.rate(window, |po| po.supplier_id == supplier_id)
    }

    pub fn for_region(&self, region: Region, window: DateWindow) -> Option<f64> {
        let ids = self.supplier_ids(|_, r| r == region);
        self.rate(window, |po| ids.contains(po.supplier_id.as_str()))
    }

    pub fn for_category(&self, category: Category, window: DateWindow) -> Option<f64> {
        let ids = self.supplier_ids(|c, _| c == category);
        self.rate(window, |po| ids.contains(po.supplier_id.as_str()))
    }

    /// OTIF per supplier over the window, skipping suppliers with no POs.
    pub fn per_supplier(&self, window: DateWindow) -> BTreeMap<String, f64> {
        self.dataset
            .suppliers
            .iter()
            .filter_map(|s| {
                self.for_supplier(&s.id, window)
                    .map(|otif| (s.id.clone(), otif))
            })
            .collect()
    }

    fn supplier_ids<F>(&self, filter: F) -> BTreeSet<&str>
    where
        F: Fn(Category, Region) -> bool,
    {
        self.dataset
            .suppliers
            .iter()
            .filter(|s| filter(s.category, s.region))
            .map(|s| s.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Supplier;

    fn supplier(id: &str, region: Region) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: "Test Supply".to_string(),
            category: Category::Food,
            region,
            base_price: 10.0,
            reliability: 0.8,
        }
    }

    fn po(id: &str, supplier: &str, late: bool, received: Option<u32>) -> PurchaseOrder {
        let order_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        PurchaseOrder {
            id: id.to_string(),
            supplier_id: supplier.to_string(),
            order_date,
            expected_delivery_date: order_date + chrono::Duration::days(10),
            expected_lead_time_days: 10,
            quantity_ordered: 100,
            quantity_received: received,
            defect_qty: 0,
            actual_lead_time_days: if late { 15 } else { 8 },
            is_late: late,
        }
    }

    fn window() -> DateWindow {
        DateWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn all_on_time_in_full_is_one() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia)],
            purchase_orders: vec![
                po("PO-1", "SUP-A", false, Some(100)),
                po("PO-2", "SUP-A", false, Some(100)),
            ],
        };
        let otif = OtifCalculator::new(&dataset).overall(window()).unwrap();
        assert!((otif - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_late_is_zero() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia)],
            purchase_orders: vec![
                po("PO-1", "SUP-A", true, Some(100)),
                po("PO-2", "SUP-A", true, Some(100)),
            ],
        };
        let otif = OtifCalculator::new(&dataset).overall(window()).unwrap();
        assert_eq!(otif, 0.0);
    }

    #[test]
    fn short_shipment_breaks_in_full() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia)],
            purchase_orders: vec![
                po("PO-1", "SUP-A", false, Some(90)),
                po("PO-2", "SUP-A", false, Some(100)),
            ],
        };
        let otif = OtifCalculator::new(&dataset).overall(window()).unwrap();
        assert!((otif - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_receipt_data_reduces_to_on_time_rate() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia)],
            purchase_orders: vec![
                po("PO-1", "SUP-A", false, None),
                po("PO-2", "SUP-A", true, None),
            ],
        };
        let otif = OtifCalculator::new(&dataset).overall(window()).unwrap();
        assert!((otif - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_window_yields_none() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia)],
            purchase_orders: vec![po("PO-1", "SUP-A", false, Some(100))],
        };
        let empty = DateWindow {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        };
        assert!(OtifCalculator::new(&dataset).overall(empty).is_none());
    }

    #[test]
    fn region_grouping_separates_suppliers() {
        let dataset = Dataset {
            suppliers: vec![supplier("SUP-A", Region::Asia), supplier("SUP-B", Region::Europe)],
            purchase_orders: vec![
                po("PO-1", "SUP-A", true, Some(100)),
                po("PO-2", "SUP-B", false, Some(100)),
            ],
        };
        let calc = OtifCalculator::new(&dataset);
        assert_eq!(calc.for_region(Region::Asia, window()).unwrap(), 0.0);
        assert!((calc.for_region(Region::Europe, window()).unwrap() - 1.0).abs() < 1e-12);
        assert!(calc.for_region(Region::Americas, window()).is_none());

        let per_supplier = calc.per_supplier(window());
        assert_eq!(per_supplier.len(), 2);
        assert_eq!(per_supplier["SUP-A"], 0.0);
    }
}
