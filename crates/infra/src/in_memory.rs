//! In-memory back-office.
//!
//! Stores products, suppliers and purchase orders behind one `RwLock`.
//! Creating an order in `RECEIVED` status raises stock in the same write-lock
//! critical section, so either the order and all stock increments are visible
//! or none are. Repeated creates with the same idempotency key return the
//! first order and leave stock alone.
//!
//! Intended for tests/dev and for running the desktop shell without a server.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tillpoint_core::{DomainError, ProductId, PurchaseOrderId, RemoteResult, StoreId};
use tillpoint_products::Product;
use tillpoint_purchasing::{LastSupplyInfo, NewPurchaseOrder, PurchaseOrder, last_supply_for};
use tillpoint_restock::{ProductCatalog, PurchaseOrderGateway, SupplierDirectory, SupplyHistory};
use tillpoint_suppliers::{Supplier, SupplierQuery};

use crate::error::StoreError;

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, Product>,
    suppliers: Vec<Supplier>,
    orders: Vec<PurchaseOrder>,
    by_idempotency_key: HashMap<Uuid, PurchaseOrderId>,
}

#[derive(Debug, Default)]
pub struct InMemoryBackOffice {
    state: RwLock<State>,
}

impl InMemoryBackOffice {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }

    /// Insert or replace a product.
    pub fn put_product(&self, product: Product) -> Result<(), StoreError> {
        self.write()?.products.insert(product.id, product);
        Ok(())
    }

    /// Register a supplier; ids must be unique.
    pub fn add_supplier(&self, supplier: Supplier) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.suppliers.iter().any(|s| s.id == supplier.id) {
            return Err(DomainError::conflict(format!("supplier {} already exists", supplier.id)).into());
        }
        state.suppliers.push(supplier);
        Ok(())
    }

    pub fn product(&self, product_id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&product_id).cloned())
    }

    pub fn orders(&self) -> Result<Vec<PurchaseOrder>, StoreError> {
        Ok(self.read()?.orders.clone())
    }

    pub fn suppliers(&self, query: SupplierQuery) -> Result<Vec<Supplier>, StoreError> {
        Ok(query.select(&self.read()?.suppliers))
    }

    pub fn find_product(&self, store_id: StoreId, product_id: ProductId) -> Result<Product, StoreError> {
        self.read()?
            .products
            .get(&product_id)
            .filter(|p| p.store_id == store_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")).into())
    }

    pub fn last_supply(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<Option<LastSupplyInfo>, StoreError> {
        let state = self.read()?;
        Ok(last_supply_for(&state.orders, store_id, product_id, |id| {
            state.suppliers.iter().find(|s| s.id == id).map(Supplier::to_ref)
        }))
    }

    /// Create an order; received orders raise stock atomically.
    pub fn create_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder, StoreError> {
        let mut state = self.write()?;

        if let Some(existing) = state.by_idempotency_key.get(&order.idempotency_key) {
            let existing = *existing;
            let stored = state
                .orders
                .iter()
                .find(|o| o.id == existing)
                .ok_or_else(|| DomainError::invariant("idempotency index out of sync"))?;
            if !stored.order.same_request(&order) {
                tracing::warn!(order_id = %existing, "idempotency key reused for a different order");
                return Err(DomainError::conflict("idempotency key already used for a different order").into());
            }
            tracing::info!(order_id = %existing, "duplicate create ignored");
            return Ok(stored.clone());
        }

        order.validate()?;

        let supplier = state
            .suppliers
            .iter()
            .find(|s| s.id == order.supplier_id)
            .ok_or_else(|| DomainError::not_found(format!("supplier {}", order.supplier_id)))?;
        if supplier.store_id != order.store_id {
            return Err(DomainError::conflict("supplier belongs to another store").into());
        }

        // Check every line before touching stock.
        for line in &order.items {
            let product = state
                .products
                .get(&line.product_id)
                .ok_or_else(|| DomainError::not_found(format!("product {}", line.product_id)))?;
            if product.store_id != order.store_id {
                return Err(DomainError::conflict(format!(
                    "product {} belongs to another store",
                    line.product_id
                ))
                .into());
            }
        }

        let created = PurchaseOrder::from_new(PurchaseOrderId::new(), Utc::now(), order);

        if created.order.status.moves_stock() {
            for line in created.lines() {
                if let Some(product) = state.products.get_mut(&line.product_id) {
                    product.receive(line.received_quantity);
                }
            }
        }

        state
            .by_idempotency_key
            .insert(created.order.idempotency_key, created.id);
        state.orders.push(created.clone());

        tracing::info!(
            order_id = %created.id,
            status = %created.order.status,
            units = created.order.total_quantity(),
            "purchase order created"
        );
        Ok(created)
    }
}

#[async_trait]
impl SupplierDirectory for InMemoryBackOffice {
    async fn list_suppliers(&self, query: SupplierQuery) -> RemoteResult<Vec<Supplier>> {
        Ok(self.suppliers(query)?)
    }
}

#[async_trait]
impl SupplyHistory for InMemoryBackOffice {
    async fn last_supply_info(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> RemoteResult<Option<LastSupplyInfo>> {
        Ok(self.last_supply(store_id, product_id)?)
    }
}

#[async_trait]
impl PurchaseOrderGateway for InMemoryBackOffice {
    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> RemoteResult<PurchaseOrder> {
        Ok(self.create_order(order)?)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryBackOffice {
    async fn get_product(&self, store_id: StoreId, product_id: ProductId) -> RemoteResult<Product> {
        Ok(self.find_product(store_id, product_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tillpoint_core::{Money, SupplierId, UserId};
    use tillpoint_purchasing::{PaymentStatus, PurchaseOrderLine, PurchaseOrderStatus};

    struct Fixture {
        back_office: InMemoryBackOffice,
        store: StoreId,
        product: Product,
        supplier: Supplier,
    }

    fn fixture() -> Fixture {
        let store = StoreId::new();
        let product = Product::new(ProductId::new(), store, "Widget")
            .with_prices(Money::new(dec!(10)), Money::new(dec!(20)))
            .with_stock(3, 5);
        let supplier = Supplier::new(SupplierId::new(), store, "Acme");
        let back_office = InMemoryBackOffice::new();
        back_office.put_product(product.clone()).unwrap();
        back_office.add_supplier(supplier.clone()).unwrap();
        Fixture {
            back_office,
            store,
            product,
            supplier,
        }
    }

    fn order(f: &Fixture, quantity: u32, status: PurchaseOrderStatus) -> NewPurchaseOrder {
        let mut line = PurchaseOrderLine::new(
            f.product.id,
            f.product.name.clone(),
            quantity,
            Money::new(dec!(12)),
            Money::new(dec!(20)),
        )
        .unwrap();
        if status == PurchaseOrderStatus::Received {
            line = line.fully_received();
        }
        let total = line.total_cost;
        NewPurchaseOrder {
            store_id: f.store,
            supplier_id: f.supplier.id,
            status,
            payment_status: PaymentStatus::Unpaid,
            expected_delivery_date: Utc::now(),
            items: vec![line],
            subtotal: total,
            total_amount: total,
            notes: String::new(),
            created_by: UserId::new(),
            idempotency_key: Uuid::now_v7(),
        }
    }

    #[test]
    fn received_order_raises_stock() {
        let f = fixture();
        f.back_office
            .create_order(order(&f, 5, PurchaseOrderStatus::Received))
            .unwrap();
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 8);
    }

    #[test]
    fn ordered_status_leaves_stock_alone() {
        let f = fixture();
        f.back_office
            .create_order(order(&f, 5, PurchaseOrderStatus::Ordered))
            .unwrap();
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn repeated_idempotency_key_creates_once() {
        let f = fixture();
        let payload = order(&f, 5, PurchaseOrderStatus::Received);

        let first = f.back_office.create_order(payload.clone()).unwrap();
        let second = f.back_office.create_order(payload).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(f.back_office.orders().unwrap().len(), 1);
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 8);
    }

    #[test]
    fn retry_with_a_later_submission_time_is_deduplicated() {
        let f = fixture();
        let payload = order(&f, 5, PurchaseOrderStatus::Received);
        let first = f.back_office.create_order(payload.clone()).unwrap();

        let retry = NewPurchaseOrder {
            expected_delivery_date: payload.expected_delivery_date + chrono::Duration::seconds(30),
            ..payload
        };
        let second = f.back_office.create_order(retry).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 8);
    }

    #[test]
    fn reused_key_for_a_different_order_is_refused() {
        let f = fixture();
        let payload = order(&f, 5, PurchaseOrderStatus::Received);
        f.back_office.create_order(payload.clone()).unwrap();

        let changed = NewPurchaseOrder {
            idempotency_key: payload.idempotency_key,
            ..order(&f, 6, PurchaseOrderStatus::Received)
        };
        let err = f.back_office.create_order(changed).unwrap_err();

        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))), "{err:?}");
        assert_eq!(f.back_office.orders().unwrap().len(), 1);
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 8);
    }

    #[test]
    fn unknown_supplier_is_rejected_without_side_effects() {
        let f = fixture();
        let mut payload = order(&f, 5, PurchaseOrderStatus::Received);
        payload.supplier_id = SupplierId::new();

        let err = f.back_office.create_order(payload).unwrap_err();

        assert!(matches!(err, StoreError::Domain(DomainError::NotFound(_))));
        assert!(f.back_office.orders().unwrap().is_empty());
        assert_eq!(f.back_office.product(f.product.id).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn invalid_totals_are_rejected() {
        let f = fixture();
        let mut payload = order(&f, 5, PurchaseOrderStatus::Received);
        payload.subtotal = Money::ZERO;

        let err = f.back_office.create_order(payload).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn last_supply_reflects_created_orders() {
        let f = fixture();
        assert_eq!(f.back_office.last_supply(f.store, f.product.id).unwrap(), None);

        f.back_office
            .create_order(order(&f, 2, PurchaseOrderStatus::Received))
            .unwrap();

        let info = f.back_office.last_supply(f.store, f.product.id).unwrap().unwrap();
        assert_eq!(info.supplier, Some(f.supplier.to_ref()));
        assert_eq!(info.last_cost, Some(Money::new(dec!(12))));
    }

    #[test]
    fn product_lookup_is_store_scoped() {
        let f = fixture();
        assert!(f.back_office.find_product(f.store, f.product.id).is_ok());
        assert!(f.back_office.find_product(StoreId::new(), f.product.id).is_err());
    }

    #[tokio::test]
    async fn rejection_reaches_callers_as_remote_error() {
        let f = fixture();
        let mut payload = order(&f, 5, PurchaseOrderStatus::Received);
        payload.supplier_id = SupplierId::new();

        let err = f.back_office.create_purchase_order(payload).await.unwrap_err();
        assert!(matches!(err, tillpoint_core::RemoteError::Rejected(_)));
    }
}
