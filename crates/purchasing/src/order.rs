use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tillpoint_core::{
    DomainError, DomainResult, Entity, Money, ProductId, PurchaseOrderId, StoreId, SupplierId,
    UserId,
};

/// Purchase order status lifecycle.
///
/// Standard orders move `PENDING → ORDERED → SHIPPED → RECEIVED`; quick restocks
/// are created directly as `RECEIVED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Pending,
    Ordered,
    Shipped,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "PENDING",
            PurchaseOrderStatus::Ordered => "ORDERED",
            PurchaseOrderStatus::Shipped => "SHIPPED",
            PurchaseOrderStatus::Received => "RECEIVED",
            PurchaseOrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether accepting an order in this status moves stock.
    pub fn moves_stock(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Received)
    }
}

impl core::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub product_id: ProductId,
    /// Product name at the time of ordering.
    pub product_name: String,
    pub quantity: u32,
    pub unit_cost: Money,
    /// Selling price the product should carry once the goods are in.
    pub selling_price: Money,
    pub total_cost: Money,
    pub received_quantity: u32,
}

impl PurchaseOrderLine {
    /// Build a line with `total_cost = quantity × unit_cost` and nothing received.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_cost: Money,
        selling_price: Money,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let total_cost = unit_cost
            .checked_times(quantity)
            .ok_or_else(|| DomainError::validation("line total overflows"))?;

        Ok(Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_cost,
            selling_price,
            total_cost,
            received_quantity: 0,
        })
    }

    /// Mark the whole ordered quantity as received.
    pub fn fully_received(mut self) -> Self {
        self.received_quantity = self.quantity;
        self
    }

    fn validate(&self, line_no: usize, status: PurchaseOrderStatus) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation(format!(
                "line {line_no}: quantity must be positive"
            )));
        }
        if self.unit_cost.is_negative() || self.selling_price.is_negative() {
            return Err(DomainError::validation(format!(
                "line {line_no}: prices cannot be negative"
            )));
        }
        if self.unit_cost.checked_times(self.quantity) != Some(self.total_cost) {
            return Err(DomainError::invariant(format!(
                "line {line_no}: total cost must equal quantity × unit cost"
            )));
        }
        if self.received_quantity > self.quantity {
            return Err(DomainError::invariant(format!(
                "line {line_no}: received quantity exceeds ordered quantity"
            )));
        }
        if status == PurchaseOrderStatus::Received && self.received_quantity != self.quantity {
            return Err(DomainError::invariant(format!(
                "line {line_no}: received orders must be fully received"
            )));
        }
        Ok(())
    }
}

/// Purchase order payload as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchaseOrder {
    pub store_id: StoreId,
    pub supplier_id: SupplierId,
    pub status: PurchaseOrderStatus,
    pub payment_status: PaymentStatus,
    pub expected_delivery_date: DateTime<Utc>,
    pub items: Vec<PurchaseOrderLine>,
    pub subtotal: Money,
    pub total_amount: Money,
    pub notes: String,
    pub created_by: UserId,
    /// Client-generated key; repeated creates with the same key yield one order.
    pub idempotency_key: Uuid,
}

impl NewPurchaseOrder {
    /// Check the totals and receipt invariants.
    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "purchase order must have at least one line",
            ));
        }

        let mut sum = Money::ZERO;
        for (idx, line) in self.items.iter().enumerate() {
            line.validate(idx + 1, self.status)?;
            sum = sum
                .checked_add(line.total_cost)
                .ok_or_else(|| DomainError::validation("order total overflows"))?;
        }

        if self.subtotal != sum {
            return Err(DomainError::invariant(
                "subtotal must equal the sum of line totals",
            ));
        }
        if self.total_amount != self.subtotal {
            return Err(DomainError::invariant("total amount must equal subtotal"));
        }
        Ok(())
    }

    /// Whether `other` asks for the same order, ignoring the submission time
    /// carried in `expected_delivery_date`.
    pub fn same_request(&self, other: &NewPurchaseOrder) -> bool {
        NewPurchaseOrder {
            expected_delivery_date: other.expected_delivery_date,
            ..self.clone()
        } == *other
    }

    /// Units on the order across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Purchase order as stored by the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub order: NewPurchaseOrder,
}

impl PurchaseOrder {
    pub fn from_new(id: PurchaseOrderId, created_at: DateTime<Utc>, order: NewPurchaseOrder) -> Self {
        Self {
            id,
            created_at,
            order,
        }
    }

    pub fn lines(&self) -> &[PurchaseOrderLine] {
        &self.order.items
    }

    pub fn line_for(&self, product_id: ProductId) -> Option<&PurchaseOrderLine> {
        self.order.items.iter().find(|l| l.product_id == product_id)
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
