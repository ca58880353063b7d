//! Collaborators of the restock workflow.
//!
//! Every remote operation returns a `RemoteResult`; callers never see a raw
//! success flag. Implementations live in `tillpoint-infra` (in-memory
//! back-office) and `tillpoint-desktop` (session store, toasts).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tillpoint_core::{ProductId, RemoteResult, StoreId, UserId};
use tillpoint_products::Product;
use tillpoint_purchasing::{LastSupplyInfo, NewPurchaseOrder, PurchaseOrder};
use tillpoint_suppliers::{Supplier, SupplierQuery};

/// The signed-in operator; recorded as the creator of every order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: UserId,
    pub name: String,
}

#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Suppliers registered to the query's store, at most `page_size` of them.
    async fn list_suppliers(&self, query: SupplierQuery) -> RemoteResult<Vec<Supplier>>;
}

#[async_trait]
pub trait SupplyHistory: Send + Sync {
    /// Last supplier/cost used for the product in the store, if any.
    async fn last_supply_info(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> RemoteResult<Option<LastSupplyInfo>>;
}

#[async_trait]
pub trait PurchaseOrderGateway: Send + Sync {
    /// Create a purchase order atomically.
    ///
    /// Accepting an order in `RECEIVED` status increases each line's product
    /// stock by its received quantity as part of the same operation.
    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> RemoteResult<PurchaseOrder>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product(&self, store_id: StoreId, product_id: ProductId) -> RemoteResult<Product>;
}

/// Everything the workflow needs from the back-office.
pub trait BackOffice: SupplierDirectory + SupplyHistory + PurchaseOrderGateway + ProductCatalog {}

impl<T> BackOffice for T where
    T: SupplierDirectory + SupplyHistory + PurchaseOrderGateway + ProductCatalog + ?Sized
{
}

/// Source of the current operator.
pub trait SessionProvider: Send + Sync {
    fn current_operator(&self) -> Option<Operator>;
}

/// Operator-facing notifications (toasts).
///
/// Fire-and-forget: implementations must not fail or block.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}
