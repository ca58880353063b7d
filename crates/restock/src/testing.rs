//! Stub collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use tillpoint_core::{ProductId, PurchaseOrderId, RemoteError, RemoteResult, StoreId, UserId};
use tillpoint_products::Product;
use tillpoint_purchasing::{LastSupplyInfo, NewPurchaseOrder, PurchaseOrder};
use tillpoint_suppliers::{Supplier, SupplierQuery};

use crate::ports::{
    Notifier, Operator, ProductCatalog, PurchaseOrderGateway, SessionProvider, SupplierDirectory,
    SupplyHistory,
};
use crate::workflow::DialogHandle;

pub struct StubBackOffice {
    suppliers: RemoteResult<Vec<Supplier>>,
    last_supply: RemoteResult<Option<LastSupplyInfo>>,
    create_errors: Mutex<VecDeque<RemoteError>>,
    create_delay: Option<Duration>,
    replayed: Option<PurchaseOrder>,
    close_during_lookup: Mutex<Option<DialogHandle>>,
    supplier_queries: Mutex<Vec<SupplierQuery>>,
    created: Mutex<Vec<NewPurchaseOrder>>,
}

impl StubBackOffice {
    pub fn new() -> Self {
        Self {
            suppliers: Ok(Vec::new()),
            last_supply: Ok(None),
            create_errors: Mutex::new(VecDeque::new()),
            create_delay: None,
            replayed: None,
            close_during_lookup: Mutex::new(None),
            supplier_queries: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_suppliers(mut self, suppliers: RemoteResult<Vec<Supplier>>) -> Self {
        self.suppliers = suppliers;
        self
    }

    pub fn with_last_supply(mut self, info: RemoteResult<Option<LastSupplyInfo>>) -> Self {
        self.last_supply = info;
        self
    }

    /// Fail the next create call with `err` (queued; one error per call).
    pub fn failing_create(self, err: RemoteError) -> Self {
        self.create_errors.lock().unwrap().push_back(err);
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Answer every successful create with `order`, as a back-office replaying
    /// an earlier commit would.
    pub fn replaying(mut self, order: PurchaseOrder) -> Self {
        self.replayed = Some(order);
        self
    }

    /// Close `handle` while the last-supply query is in flight.
    pub fn close_during_lookup(&self, handle: DialogHandle) {
        *self.close_during_lookup.lock().unwrap() = Some(handle);
    }

    pub fn created(&self) -> Vec<NewPurchaseOrder> {
        self.created.lock().unwrap().clone()
    }

    pub fn supplier_queries(&self) -> Vec<SupplierQuery> {
        self.supplier_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SupplierDirectory for StubBackOffice {
    async fn list_suppliers(&self, query: SupplierQuery) -> RemoteResult<Vec<Supplier>> {
        self.supplier_queries.lock().unwrap().push(query);
        self.suppliers.clone()
    }
}

#[async_trait]
impl SupplyHistory for StubBackOffice {
    async fn last_supply_info(
        &self,
        _store_id: StoreId,
        _product_id: ProductId,
    ) -> RemoteResult<Option<LastSupplyInfo>> {
        if let Some(handle) = self.close_during_lookup.lock().unwrap().take() {
            handle.close();
        }
        self.last_supply.clone()
    }
}

#[async_trait]
impl PurchaseOrderGateway for StubBackOffice {
    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> RemoteResult<PurchaseOrder> {
        self.created.lock().unwrap().push(order.clone());
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let next_error = self.create_errors.lock().unwrap().pop_front();
        match next_error {
            Some(err) => Err(err),
            None => Ok(self
                .replayed
                .clone()
                .unwrap_or_else(|| PurchaseOrder::from_new(PurchaseOrderId::new(), Utc::now(), order))),
        }
    }
}

#[async_trait]
impl ProductCatalog for StubBackOffice {
    async fn get_product(&self, _store_id: StoreId, product_id: ProductId) -> RemoteResult<Product> {
        Err(RemoteError::rejected(format!("product {product_id} not found")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Info(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.toasts.lock().unwrap().push(Toast::Success(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.toasts.lock().unwrap().push(Toast::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts.lock().unwrap().push(Toast::Error(message.to_string()));
    }
}

pub struct FixedSession(pub Option<Operator>);

impl FixedSession {
    pub fn signed_in() -> Self {
        Self(Some(Operator {
            id: UserId::new(),
            name: "Dana".to_string(),
        }))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionProvider for FixedSession {
    fn current_operator(&self) -> Option<Operator> {
        self.0.clone()
    }
}
