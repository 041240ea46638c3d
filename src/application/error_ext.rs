//! Error conversion helpers for store operations
//!
//! Provides an extension trait for attaching the failed action to store errors.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::StoreResult;

/// Extension trait for converting `StoreResult` to `ApplicationResult` with context.
pub trait StoreResultExt<T> {
    /// Add action context to a store error.
    ///
    /// # Example
    /// ```ignore
    /// store.list().with_store_context("load units")?;
    /// ```
    fn with_store_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn with_store_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::StoreUnavailable {
            context: action.to_string(),
            source,
        })
    }
}
