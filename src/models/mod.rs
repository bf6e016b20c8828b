//! Domain model: suppliers and purchase orders.
//!
//! Both record types are immutable once generated. Rolling statistics
//! derived from purchase-order history live in feature-side snapshots
//! (`crate::features`), never on the records themselves.

pub mod purchase_order;
pub mod supplier;

pub use purchase_order::PurchaseOrder;
pub use supplier::{Category, Region, Supplier};
