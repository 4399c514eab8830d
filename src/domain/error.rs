//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Errors from reading editing commands.
///
/// Tree mutations themselves never fail: an unknown id is a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument: {value}")]
    UnexpectedArgument { command: &'static str, value: String },
}
