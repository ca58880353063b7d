//! Last-supply derivation from purchase-order history.

use serde::{Deserialize, Serialize};

use tillpoint_core::{Money, ProductId, StoreId, SupplierId};
use tillpoint_suppliers::SupplierRef;

use crate::order::{PurchaseOrder, PurchaseOrderStatus};

/// Most recent supplier/cost pairing known for a product in a store.
///
/// Only a prefill hint. An info with neither field set carries no hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSupplyInfo {
    #[serde(default)]
    pub supplier: Option<SupplierRef>,
    #[serde(default)]
    pub last_cost: Option<Money>,
}

impl LastSupplyInfo {
    pub fn is_empty(&self) -> bool {
        self.supplier.is_none() && self.last_cost.is_none()
    }
}

/// Derive the last-supply hint for `product_id` in `store_id`.
///
/// Looks at the store's non-cancelled orders containing the product and takes
/// the most recently created one (on equal timestamps the later one in
/// iteration order wins). `resolve_supplier` maps the order's supplier id to a
/// display reference; a supplier that no longer resolves still yields the cost.
pub fn last_supply_for<'a, I, F>(
    orders: I,
    store_id: StoreId,
    product_id: ProductId,
    resolve_supplier: F,
) -> Option<LastSupplyInfo>
where
    I: IntoIterator<Item = &'a PurchaseOrder>,
    F: Fn(SupplierId) -> Option<SupplierRef>,
{
    let (order, line) = orders
        .into_iter()
        .filter(|o| o.order.store_id == store_id)
        .filter(|o| o.order.status != PurchaseOrderStatus::Cancelled)
        .filter_map(|o| o.line_for(product_id).map(|l| (o, l)))
        .max_by_key(|(o, _)| o.created_at)?;

    Some(LastSupplyInfo {
        supplier: resolve_supplier(order.order.supplier_id),
        last_cost: Some(line.unit_cost),
    })
}
