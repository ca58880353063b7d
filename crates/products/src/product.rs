use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, Money, ProductId, StoreId};

/// Stock classification shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

/// Catalog product as returned by the back-office.
///
/// Prices are optional because products can be created without them; the
/// restock form falls back to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub buying_price: Option<Money>,
    #[serde(default)]
    pub selling_price: Option<Money>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
}

impl Product {
    pub fn new(id: ProductId, store_id: StoreId, name: impl Into<String>) -> Self {
        Self {
            id,
            store_id,
            name: name.into(),
            sku: None,
            buying_price: None,
            selling_price: None,
            stock: 0,
            min_stock: 0,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_prices(mut self, buying: Money, selling: Money) -> Self {
        self.buying_price = Some(buying);
        self.selling_price = Some(selling);
        self
    }

    pub fn with_stock(mut self, stock: i64, min_stock: i64) -> Self {
        self.stock = stock;
        self.min_stock = min_stock;
        self
    }

    /// Unit cost used to prefill a restock when no purchase history exists.
    pub fn default_unit_cost(&self) -> Money {
        self.buying_price.unwrap_or(Money::ZERO)
    }

    /// Selling price used to prefill a restock.
    pub fn default_selling_price(&self) -> Money {
        self.selling_price.unwrap_or(Money::ZERO)
    }

    pub fn stock_level(&self) -> StockLevel {
        if self.stock <= 0 {
            StockLevel::OutOfStock
        } else if self.stock <= self.min_stock {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    /// Apply a received quantity to the on-hand stock.
    ///
    /// Saturates instead of wrapping; a catalog never holds `i64::MAX` units.
    pub fn receive(&mut self, quantity: u32) {
        self.stock = self.stock.saturating_add(i64::from(quantity));
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
