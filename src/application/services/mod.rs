//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the store boundary trait (UnitStore)
//! but are themselves concrete structs, not traits.

mod network;

pub use network::{DeleteOutcome, NetworkService};
