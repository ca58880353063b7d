//! Infrastructure layer: back-office implementations of the restock ports.
//!
//! - [`in_memory`]: self-contained back-office (tests/dev, offline demo).
//! - [`bridge`]: typed proxy over the UI bridge's named calls.

pub mod bridge;
pub mod error;
pub mod in_memory;

pub use bridge::{BridgeBackOffice, Invoker};
pub use error::StoreError;
pub use in_memory::InMemoryBackOffice;
