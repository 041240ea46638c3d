//! Store boundary trait for testability
//!
//! The unit store is the only shared resource. Services talk to it through
//! this trait so they can run against the in-memory store in tests and the
//! JSON file store in the binary.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Unit, UnitId, UnitPatch, ValidUnit};

/// Failures raised by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {context}")]
    Unavailable {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store data in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Create an unavailable error with context.
    pub fn unavailable(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Unavailable {
            context: context.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Query/command contract of the flat unit store.
///
/// Every operation is a single unit of work from the caller's view; no
/// locking spans two calls.
pub trait UnitStore: Send + Sync {
    /// All units, in insertion order.
    fn list(&self) -> StoreResult<Vec<Unit>>;

    /// One unit by id.
    fn get(&self, id: &UnitId) -> StoreResult<Option<Unit>>;

    /// Direct children of `parent`, in insertion order.
    fn find_by_parent(&self, parent: &UnitId) -> StoreResult<Vec<Unit>>;

    /// Persist a new unit. The store assigns the id and both timestamps.
    fn insert(&self, unit: ValidUnit) -> StoreResult<Unit>;

    /// Apply a partial update and bump `updated_at`.
    ///
    /// Returns `None` if no unit has that id.
    fn update(&self, id: &UnitId, patch: &UnitPatch) -> StoreResult<Option<Unit>>;

    /// Remove all listed ids in one operation. Unknown ids are ignored.
    ///
    /// Returns the number of units removed.
    fn delete_many(&self, ids: &[UnitId]) -> StoreResult<usize>;
}
