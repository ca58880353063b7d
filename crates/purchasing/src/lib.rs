//! Purchasing domain module (purchase orders and supply history).
//!
//! This crate contains the purchase-order payload, its totals invariants and the
//! last-supply derivation, implemented purely as deterministic domain logic (no
//! IO, no storage).

pub mod history;
pub mod order;

pub use history::{LastSupplyInfo, last_supply_for};
pub use order::{
    NewPurchaseOrder, PaymentStatus, PurchaseOrder, PurchaseOrderLine, PurchaseOrderStatus,
};
