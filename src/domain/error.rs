//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{Level, UnitId};

/// Domain errors represent hierarchy rule violations.
/// These are detected before the store is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid level '{0}': expected one of union, village, ward, booth")]
    InvalidLevel(String),

    #[error("{0} requires a parent unit")]
    MissingParent(Level),

    #[error("unit name must not be empty")]
    MissingName,

    #[error("invalid parent {parent} for {level}: {reason}")]
    InvalidParent {
        level: Level,
        parent: UnitId,
        reason: String,
    },
}
