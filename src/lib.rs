//! calltree: build and annotate rooted call trees.
//!
//! A tree of labeled nodes where every parent-to-child edge may carry a
//! return value, edited through a persistent mutation engine: each edit
//! returns a new tree version that shares all untouched subtrees with the
//! previous one.
//!
//! ```
//! use calltree::domain::{SequentialIds, TreeEngine};
//!
//! let mut engine = TreeEngine::new(SequentialIds::default());
//! let tree = engine.initialize_root();
//! let root = tree.root().unwrap().id().clone();
//! let next = engine.add_child(&tree, &root);
//! assert_eq!(next.len(), 2);
//! assert_eq!(tree.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod render;
pub mod util;

pub use domain::{Command, NodeId, Tree, TreeEngine, TreeNode};
