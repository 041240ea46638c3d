//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, ErrorKind, ErrorReport};
use crate::config::SettingsError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Infra(InfraError::Settings(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Settings(_) => crate::exitcode::CONFIG,
                InfraError::Application(e) => match e.kind() {
                    ErrorKind::InvalidLevel
                    | ErrorKind::MissingParent
                    | ErrorKind::MissingName
                    | ErrorKind::InvalidParent => crate::exitcode::DATAERR,
                    ErrorKind::NotFound => crate::exitcode::NOINPUT,
                    ErrorKind::StoreUnavailable => crate::exitcode::UNAVAILABLE,
                },
            },
        }
    }

    /// Structured report for errors raised by a network operation.
    pub fn report(&self) -> Option<ErrorReport> {
        match self {
            CliError::Infra(InfraError::Application(e)) => Some(e.report()),
            _ => None,
        }
    }
}
