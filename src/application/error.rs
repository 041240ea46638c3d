//! Application-level errors (wraps domain and store errors)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DomainError, UnitId};
use crate::infrastructure::traits::StoreError;

/// Application errors wrap domain errors and add lookup and store failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("unit not found: {0}")]
    NotFound(UnitId),

    #[error("{context}: {source}")]
    StoreUnavailable {
        context: String,
        #[source]
        source: StoreError,
    },
}

/// Stable error classification handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidLevel,
    MissingParent,
    MissingName,
    InvalidParent,
    NotFound,
    StoreUnavailable,
}

/// Structured failure: error kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::Domain(e) => match e {
                DomainError::InvalidLevel(_) => ErrorKind::InvalidLevel,
                DomainError::MissingParent(_) => ErrorKind::MissingParent,
                DomainError::MissingName => ErrorKind::MissingName,
                DomainError::InvalidParent { .. } => ErrorKind::InvalidParent,
            },
            ApplicationError::NotFound(_) => ErrorKind::NotFound,
            ApplicationError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
