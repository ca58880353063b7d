//! Supplier/cost lookup.
//!
//! Fetches the store's suppliers and the last supply hint for a product. The
//! two queries run concurrently and fail independently; a failure is logged and
//! treated as "nothing found". The lookup never returns an error.

use tillpoint_core::{ProductId, StoreId};
use tillpoint_purchasing::LastSupplyInfo;
use tillpoint_suppliers::{Supplier, SupplierQuery, SupplierRef};

use crate::ports::{BackOffice, Notifier};

/// What the lookup found. Both parts may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyHint {
    pub suppliers: Vec<Supplier>,
    pub last_supply: Option<LastSupplyInfo>,
}

impl SupplyHint {
    /// Supplier named by the purchase history, if any.
    pub fn last_supplier(&self) -> Option<&SupplierRef> {
        self.last_supply.as_ref().and_then(|i| i.supplier.as_ref())
    }
}

pub struct SupplierCostLookup<'a> {
    back_office: &'a dyn BackOffice,
    notifier: &'a dyn Notifier,
    page_size: u32,
}

impl<'a> SupplierCostLookup<'a> {
    pub fn new(back_office: &'a dyn BackOffice, notifier: &'a dyn Notifier, page_size: u32) -> Self {
        Self {
            back_office,
            notifier,
            page_size: page_size.max(1),
        }
    }

    /// Fetch and announce: runs [`fetch`](Self::fetch), then [`announce`](Self::announce).
    pub async fn lookup(&self, store_id: StoreId, product_id: ProductId) -> SupplyHint {
        let hint = self.fetch(store_id, product_id).await;
        self.announce(&hint);
        hint
    }

    /// Run both queries without notifying anyone.
    pub async fn fetch(&self, store_id: StoreId, product_id: ProductId) -> SupplyHint {
        let query = SupplierQuery::for_store(store_id).with_page_size(self.page_size);
        let (suppliers, last_supply) = tokio::join!(
            self.back_office.list_suppliers(query),
            self.back_office.last_supply_info(store_id, product_id),
        );

        let suppliers = suppliers.unwrap_or_else(|err| {
            tracing::warn!(store_id = %store_id, error = %err, "supplier list unavailable");
            Vec::new()
        });

        let last_supply = match last_supply {
            Ok(Some(info)) if !info.is_empty() => Some(info),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    store_id = %store_id,
                    product_id = %product_id,
                    error = %err,
                    "last supply lookup failed"
                );
                None
            }
        };

        tracing::debug!(
            suppliers = suppliers.len(),
            has_hint = last_supply.is_some(),
            "supplier/cost lookup finished"
        );

        SupplyHint {
            suppliers,
            last_supply,
        }
    }

    /// Tell the operator which supplier was filled in, if one was.
    pub fn announce(&self, hint: &SupplyHint) {
        if let Some(supplier) = hint.last_supplier() {
            self.notifier
                .info(&format!("Last supplier auto-filled: {}", supplier.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillpoint_core::{Money, RemoteError, SupplierId};

    use crate::testing::{RecordingNotifier, StubBackOffice, Toast};

    #[tokio::test]
    async fn hint_is_returned_and_announced_once() {
        let store = StoreId::new();
        let acme = Supplier::new(SupplierId::new(), store, "Acme");
        let back_office = StubBackOffice::new()
            .with_suppliers(Ok(vec![acme.clone()]))
            .with_last_supply(Ok(Some(LastSupplyInfo {
                supplier: Some(acme.to_ref()),
                last_cost: Some(Money::from_minor_units(950)),
            })));
        let notifier = RecordingNotifier::default();

        let hint = SupplierCostLookup::new(&back_office, &notifier, 100)
            .lookup(store, ProductId::new())
            .await;

        assert_eq!(hint.suppliers, vec![acme.clone()]);
        assert_eq!(hint.last_supplier().map(|s| s.id), Some(acme.id));
        assert_eq!(
            notifier.toasts(),
            vec![Toast::Info("Last supplier auto-filled: Acme".to_string())]
        );
    }

    #[tokio::test]
    async fn failures_degrade_to_empty_hint() {
        let back_office = StubBackOffice::new()
            .with_suppliers(Err(RemoteError::transport("bridge down")))
            .with_last_supply(Err(RemoteError::rejected("boom")));
        let notifier = RecordingNotifier::default();

        let hint = SupplierCostLookup::new(&back_office, &notifier, 100)
            .lookup(StoreId::new(), ProductId::new())
            .await;

        assert_eq!(hint, SupplyHint::default());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn one_failing_query_does_not_hide_the_other() {
        let store = StoreId::new();
        let acme = Supplier::new(SupplierId::new(), store, "Acme");
        let back_office = StubBackOffice::new()
            .with_suppliers(Err(RemoteError::transport("bridge down")))
            .with_last_supply(Ok(Some(LastSupplyInfo {
                supplier: Some(acme.to_ref()),
                last_cost: None,
            })));
        let notifier = RecordingNotifier::default();

        let hint = SupplierCostLookup::new(&back_office, &notifier, 100)
            .lookup(store, ProductId::new())
            .await;

        assert!(hint.suppliers.is_empty());
        assert_eq!(hint.last_supplier().map(|s| s.id), Some(acme.id));
    }

    #[tokio::test]
    async fn empty_last_supply_payload_means_no_hint() {
        let back_office = StubBackOffice::new().with_last_supply(Ok(Some(LastSupplyInfo::default())));
        let notifier = RecordingNotifier::default();

        let hint = SupplierCostLookup::new(&back_office, &notifier, 100)
            .lookup(StoreId::new(), ProductId::new())
            .await;

        assert_eq!(hint.last_supply, None);
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn page_size_is_forwarded() {
        let back_office = StubBackOffice::new();
        let notifier = RecordingNotifier::default();

        SupplierCostLookup::new(&back_office, &notifier, 25)
            .fetch(StoreId::new(), ProductId::new())
            .await;

        assert_eq!(back_office.supplier_queries()[0].page_size, 25);
    }
}
