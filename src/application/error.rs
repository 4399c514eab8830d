//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors: domain errors tagged with their script line, and
/// configuration problems.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: DomainError,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
