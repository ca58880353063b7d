//! Quick-restock purchase order payload.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tillpoint_core::StoreId;
use tillpoint_products::Product;
use tillpoint_purchasing::{NewPurchaseOrder, PaymentStatus, PurchaseOrderLine, PurchaseOrderStatus};

use crate::error::RestockError;
use crate::form::RestockForm;
use crate::ports::Operator;

/// Note attached to every quick-restock order.
pub const QUICK_RESTOCK_NOTE: &str =
    "Quick restock: goods recorded as received on entry, not through the standard purchase order flow";

/// Inputs of a quick-restock order.
#[derive(Debug, Clone)]
pub struct QuickRestock<'a> {
    pub store_id: StoreId,
    pub product: &'a Product,
    pub form: &'a RestockForm,
    pub operator: &'a Operator,
    pub idempotency_key: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl QuickRestock<'_> {
    /// Build the single-line, fully received, unpaid order.
    pub fn build(&self) -> Result<NewPurchaseOrder, RestockError> {
        let supplier_id = self.form.supplier_id.ok_or(RestockError::MissingInput)?;
        if self.form.quantity == 0 {
            return Err(RestockError::MissingInput);
        }

        let line = PurchaseOrderLine::new(
            self.product.id,
            self.product.name.clone(),
            self.form.quantity,
            self.form.unit_cost,
            self.form.selling_price,
        )?
        .fully_received();
        let total = line.total_cost;

        let order = NewPurchaseOrder {
            store_id: self.store_id,
            supplier_id,
            status: PurchaseOrderStatus::Received,
            payment_status: PaymentStatus::Unpaid,
            expected_delivery_date: self.submitted_at,
            items: vec![line],
            subtotal: total,
            total_amount: total,
            notes: QUICK_RESTOCK_NOTE.to_string(),
            created_by: self.operator.id,
            idempotency_key: self.idempotency_key,
        };
        order.validate()?;
        Ok(order)
    }
}
