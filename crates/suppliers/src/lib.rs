//! Suppliers domain module.
//!
//! Suppliers are registered per store. The restock workflow only reads them:
//! a bounded list for selection and a `SupplierRef` when history names one.

pub mod supplier;

pub use supplier::{ContactInfo, DEFAULT_PAGE_SIZE, Supplier, SupplierQuery, SupplierRef};
