//! Infrastructure layer: store implementations and DI container
//!
//! This layer implements the store boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use store::{JsonFileStore, MemoryStore};
pub use traits::{StoreError, StoreResult, UnitStore};
