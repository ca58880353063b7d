use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, StoreId, SupplierId, ValueObject};

/// Number of suppliers fetched for the selection list.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Contact information for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Supplier registered to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub store_id: StoreId,
    pub name: String,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Supplier {
    pub fn new(id: SupplierId, store_id: StoreId, name: impl Into<String>) -> Self {
        Self {
            id,
            store_id,
            name: name.into(),
            contact: ContactInfo::default(),
        }
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = contact;
        self
    }

    pub fn to_ref(&self) -> SupplierRef {
        SupplierRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Identity and display name of a supplier, as embedded in other payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: SupplierId,
    pub name: String,
}

impl ValueObject for SupplierRef {}

/// Parameters of a supplier list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuery {
    pub store_id: StoreId,
    pub page_size: u32,
}

impl SupplierQuery {
    pub fn for_store(store_id: StoreId) -> Self {
        Self {
            store_id,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Apply the query to an in-memory directory, preserving input order.
    pub fn select<'a>(&self, suppliers: impl IntoIterator<Item = &'a Supplier>) -> Vec<Supplier> {
        suppliers
            .into_iter()
            .filter(|s| s.store_id == self.store_id)
            .take(self.page_size as usize)
            .cloned()
            .collect()
    }
}
