//! `tillpoint-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every other crate:
//! identifiers, money, the domain error model and the typed result of calls
//! that cross the UI/back-office boundary.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod remote;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, PurchaseOrderId, StoreId, SupplierId, UserId};
pub use money::{MINOR_UNIT_SCALE, Money};
pub use remote::{Envelope, RemoteError, RemoteResult};
pub use value_object::ValueObject;
