//! Party network hierarchy engine.
//!
//! Units form a forest of four fixed levels (`union → village → ward → booth`)
//! stored as a flat collection. [`application::services::NetworkService`] reads
//! the forest back and applies create, update and cascading delete operations
//! against a [`infrastructure::UnitStore`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
