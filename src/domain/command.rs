//! Textual editing commands
//!
//! One command per line: a verb, usually a node id, and for the label and
//! return value commands the rest of the line as text.

use std::str::FromStr;

use crate::domain::error::DomainError;
use crate::domain::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateRoot,
    AddChild { parent: NodeId },
    Remove { node: NodeId },
    SetLabel { node: NodeId, label: String },
    SetReturnValue { node: NodeId, value: String },
    ToggleExpanded { node: NodeId },
    Show,
}

impl Command {
    /// Whether the command changes the tree when it applies.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Show)
    }

    /// Node the command targets, if any.
    pub fn target(&self) -> Option<&NodeId> {
        match self {
            Command::AddChild { parent } => Some(parent),
            Command::Remove { node }
            | Command::SetLabel { node, .. }
            | Command::SetReturnValue { node, .. }
            | Command::ToggleExpanded { node } => Some(node),
            Command::CreateRoot | Command::Show => None,
        }
    }

    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Command>, DomainError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse::<Command>().map(Some)
    }
}

impl FromStr for Command {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = match s.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (s, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "root" | "create-root" => {
                no_argument("root", rest)?;
                Ok(Command::CreateRoot)
            }
            "show" => {
                no_argument("show", rest)?;
                Ok(Command::Show)
            }
            "add" => Ok(Command::AddChild {
                parent: single_id("add", rest)?,
            }),
            "remove" | "rm" => Ok(Command::Remove {
                node: single_id("remove", rest)?,
            }),
            "toggle" => Ok(Command::ToggleExpanded {
                node: single_id("toggle", rest)?,
            }),
            "label" => {
                let (node, label) = id_and_text("label", rest)?;
                Ok(Command::SetLabel { node, label })
            }
            "return" | "ret" => {
                let (node, value) = id_and_text("return", rest)?;
                Ok(Command::SetReturnValue { node, value })
            }
            other => Err(DomainError::UnknownCommand(other.to_string())),
        }
    }
}

fn no_argument(command: &'static str, rest: &str) -> Result<(), DomainError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(DomainError::UnexpectedArgument {
            command,
            value: rest.to_string(),
        })
    }
}

fn single_id(command: &'static str, rest: &str) -> Result<NodeId, DomainError> {
    let mut parts = rest.split_whitespace();
    let id = parts.next().ok_or(DomainError::MissingArgument {
        command,
        argument: "id",
    })?;
    if let Some(extra) = parts.next() {
        return Err(DomainError::UnexpectedArgument {
            command,
            value: extra.to_string(),
        });
    }
    Ok(NodeId::new(id))
}

fn id_and_text(command: &'static str, rest: &str) -> Result<(NodeId, String), DomainError> {
    if rest.is_empty() {
        return Err(DomainError::MissingArgument {
            command,
            argument: "id",
        });
    }
    let (id, text) = match rest.split_once(char::is_whitespace) {
        Some((id, text)) => (id, text.trim()),
        None => (rest, ""),
    };
    Ok((NodeId::new(id), text.to_string()))
}
