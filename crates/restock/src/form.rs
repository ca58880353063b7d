//! Restock form state and operator input coercion.
//!
//! Inputs are corrected at entry time rather than rejected: a quantity is
//! always at least 1 and prices are never negative.

use serde::{Deserialize, Serialize};

use tillpoint_core::{Money, SupplierId};
use tillpoint_products::Product;
use tillpoint_purchasing::LastSupplyInfo;

/// Quantity typed by the operator, clamped to at least 1.
///
/// Non-numeric input becomes 1; fractional input is truncated first, so
/// `"5.7"` is 5 and `"0.5"` is 1.
pub fn coerce_quantity(input: &str) -> u32 {
    let input = input.trim();
    let parsed = input.parse::<i64>().ok().or_else(|| {
        input
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    });

    match parsed {
        Some(v) if v >= 1 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// Amount typed by the operator; blank, non-numeric or negative input is 0.
pub fn coerce_amount(input: &str) -> Money {
    match Money::parse_input(input) {
        Some(m) if !m.is_negative() && !m.is_zero() => m,
        _ => Money::ZERO,
    }
}

/// A single edit coming from the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FormEdit {
    Supplier(Option<SupplierId>),
    Quantity(String),
    UnitCost(String),
    SellingPrice(String),
}

/// Restock dialog fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockForm {
    pub supplier_id: Option<SupplierId>,
    pub quantity: u32,
    pub unit_cost: Money,
    pub selling_price: Money,
}

impl RestockForm {
    /// Defaults shown before (or without) a supply hint.
    pub fn for_product(product: &Product) -> Self {
        Self {
            supplier_id: None,
            quantity: 1,
            unit_cost: product.default_unit_cost(),
            selling_price: product.default_selling_price(),
        }
    }

    /// Adopt the hinted supplier and last cost. Absent fields leave the form as is.
    pub fn apply_hint(&mut self, hint: &LastSupplyInfo) {
        if let Some(supplier) = &hint.supplier {
            self.supplier_id = Some(supplier.id);
        }
        if let Some(cost) = hint.last_cost.filter(|c| !c.is_negative()) {
            self.unit_cost = cost;
        }
    }

    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Supplier(id) => self.supplier_id = id,
            FormEdit::Quantity(raw) => self.quantity = coerce_quantity(&raw),
            FormEdit::UnitCost(raw) => self.unit_cost = coerce_amount(&raw),
            FormEdit::SellingPrice(raw) => self.selling_price = coerce_amount(&raw),
        }
    }

    /// `quantity × unit_cost`, as the order line will carry it.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_cost.checked_times(self.quantity)
    }
}
