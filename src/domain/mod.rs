//! Domain layer: the call tree model and its mutation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod command;
pub mod engine;
pub mod error;
pub mod ids;
pub mod node;
pub mod tree;

pub use command::Command;
pub use engine::TreeEngine;
pub use error::DomainError;
pub use ids::{IdGenerator, IdStyle, RandomIds, SequentialIds};
pub use node::{NodeId, TreeNode};
pub use tree::{PreOrderIter, Tree};
