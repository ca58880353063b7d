//! Back-office reached through the UI bridge.
//!
//! Every operation is a named call with JSON arguments, answered by a
//! `{ success, data, error }` envelope. [`BridgeBackOffice`] is the typed proxy
//! over whatever transport implements [`Invoker`]; the success flag is checked
//! here and nowhere else.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use tillpoint_core::remote::{decode, decode_optional};
use tillpoint_core::{ProductId, RemoteError, RemoteResult, StoreId};
use tillpoint_products::Product;
use tillpoint_purchasing::{LastSupplyInfo, NewPurchaseOrder, PurchaseOrder};
use tillpoint_restock::{ProductCatalog, PurchaseOrderGateway, SupplierDirectory, SupplyHistory};
use tillpoint_suppliers::{Supplier, SupplierQuery};

/// Channel names understood by the back-office process.
pub mod channels {
    pub const LIST_SUPPLIERS: &str = "suppliers:list";
    pub const LAST_SUPPLY_INFO: &str = "purchaseOrders:getLastSupplyInfo";
    pub const CREATE_PURCHASE_ORDER: &str = "purchaseOrders:create";
    pub const GET_PRODUCT: &str = "products:getById";
}

/// Transport for named calls. Returns the raw response or a transport failure.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, channel: &str, args: Value) -> Result<Value, String>;
}

pub struct BridgeBackOffice {
    invoker: Arc<dyn Invoker>,
}

impl BridgeBackOffice {
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self { invoker }
    }

    async fn call(&self, channel: &str, args: Value) -> RemoteResult<Value> {
        tracing::debug!(channel, "bridge call");
        self.invoker.invoke(channel, args).await.map_err(|e| {
            tracing::warn!(channel, error = %e, "bridge call failed");
            RemoteError::transport(e)
        })
    }

    async fn call_required<T: DeserializeOwned>(&self, channel: &str, args: Value) -> RemoteResult<T> {
        decode(self.call(channel, args).await?)
    }

    async fn call_optional<T: DeserializeOwned>(
        &self,
        channel: &str,
        args: Value,
    ) -> RemoteResult<Option<T>> {
        decode_optional(self.call(channel, args).await?)
    }
}

fn to_args<T: Serialize>(value: &T) -> RemoteResult<Value> {
    serde_json::to_value(value).map_err(|e| RemoteError::transport(format!("cannot encode request: {e}")))
}

#[async_trait]
impl SupplierDirectory for BridgeBackOffice {
    async fn list_suppliers(&self, query: SupplierQuery) -> RemoteResult<Vec<Supplier>> {
        self.call_required(channels::LIST_SUPPLIERS, to_args(&query)?).await
    }
}

#[async_trait]
impl SupplyHistory for BridgeBackOffice {
    async fn last_supply_info(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> RemoteResult<Option<LastSupplyInfo>> {
        let args = json!({ "storeId": store_id, "productId": product_id });
        let info: Option<LastSupplyInfo> = self.call_optional(channels::LAST_SUPPLY_INFO, args).await?;
        Ok(info.filter(|i| !i.is_empty()))
    }
}

#[async_trait]
impl PurchaseOrderGateway for BridgeBackOffice {
    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> RemoteResult<PurchaseOrder> {
        self.call_required(channels::CREATE_PURCHASE_ORDER, to_args(&order)?)
            .await
    }
}

#[async_trait]
impl ProductCatalog for BridgeBackOffice {
    async fn get_product(&self, store_id: StoreId, product_id: ProductId) -> RemoteResult<Product> {
        let args = json!({ "storeId": store_id, "id": product_id });
        self.call_required(channels::GET_PRODUCT, args).await
    }
}
