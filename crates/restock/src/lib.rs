//! Restock-and-replenishment workflow.
//!
//! Turns an operator's "add N units of P at cost C from supplier Z" into a
//! single purchase order created directly in `RECEIVED` status. The
//! back-office is trusted to raise the product's stock when it accepts such an
//! order; this crate never touches stock itself.
//!
//! - [`lookup`]: supplier list + last supplier/cost hint, degrading to defaults.
//! - [`form`]: restock form state and operator input coercion.
//! - [`quick_order`]: the single-line purchase order payload.
//! - [`workflow`]: the dialog state machine (idle → validating → submitting →
//!   succeeded | failed).
//! - [`ports`]: the collaborators, injected as trait objects.

pub mod error;
pub mod form;
pub mod lookup;
pub mod ports;
pub mod quick_order;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::RestockError;
pub use form::{FormEdit, RestockForm, coerce_amount, coerce_quantity};
pub use lookup::{SupplierCostLookup, SupplyHint};
pub use ports::{
    BackOffice, Notifier, Operator, ProductCatalog, PurchaseOrderGateway, SessionProvider,
    SupplierDirectory, SupplyHistory,
};
pub use quick_order::{QUICK_RESTOCK_NOTE, QuickRestock};
pub use workflow::{DialogHandle, RestockContext, RestockDialog, RestockSettings, RestockState};
