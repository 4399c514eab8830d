//! Application layer: editing sessions and command scripts
//!
//! This layer drives the domain engine and owns the current tree version.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{Outcome, ScriptSummary, SessionService, Step};
