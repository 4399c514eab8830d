//! Node id generation

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::node::NodeId;

/// Source of fresh node ids.
///
/// Ids need to be unique only among the ids handed out by one generator,
/// which is exactly the set of ids one engine can put into its trees.
pub trait IdGenerator: fmt::Debug {
    fn next_id(&mut self) -> NodeId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> NodeId {
        (**self).next_id()
    }
}

/// Counter based ids: `n1`, `n2`, ...
///
/// Short enough to type in a script or the interactive shell.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("n")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Random UUID v4 ids in their 32 character simple form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Which generator a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    #[default]
    Sequential,
    Random,
}

impl IdStyle {
    pub fn generator(self, prefix: &str) -> Box<dyn IdGenerator> {
        match self {
            IdStyle::Sequential => Box::new(SequentialIds::new(prefix)),
            IdStyle::Random => Box::new(RandomIds),
        }
    }
}

impl std::str::FromStr for IdStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdStyle::Sequential),
            "random" => Ok(IdStyle::Random),
            other => Err(format!("unknown id style: {other} (expected sequential or random)")),
        }
    }
}
