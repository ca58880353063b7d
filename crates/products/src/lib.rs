//! Products domain module (catalog snapshots).
//!
//! The catalog itself lives behind the back-office; this crate only describes
//! the product data the restock workflow reads.

pub mod product;

pub use product::{Product, StockLevel};
