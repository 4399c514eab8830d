//! Editing session
//!
//! Holds the current tree version and swaps it for the engine's result after
//! every command, the way a presentation layer replaces its held reference.

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{Command, IdGenerator, Tree, TreeEngine};

/// What a command did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new tree version replaced the old one.
    Applied,
    /// The target did not exist (or was the root, for removal); nothing changed.
    NoOp,
}

/// One executed script line, handed to the step callback of
/// [`SessionService::run_script`].
#[derive(Debug)]
pub struct Step<'a> {
    /// 1-based line number in the script
    pub line: usize,
    pub command: &'a Command,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub applied: usize,
    pub no_ops: usize,
}

/// Service applying editing commands to a single, exclusively owned tree.
#[derive(Debug)]
pub struct SessionService {
    engine: TreeEngine<Box<dyn IdGenerator>>,
    tree: Tree,
}

impl SessionService {
    /// Create a session without a tree, drawing ids from `ids`.
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            engine: TreeEngine::new(ids),
            tree: Tree::uninitialized(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.id_style.generator(&settings.id_prefix))
    }

    /// Current tree version.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Apply one command and keep the resulting tree.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, command: &Command) -> Outcome {
        let next = match command {
            Command::CreateRoot => self.engine.initialize_root(),
            Command::AddChild { parent } => self.engine.add_child(&self.tree, parent),
            Command::Remove { node } => self.engine.remove_node(&self.tree, node),
            Command::SetLabel { node, label } => self.engine.update_label(&self.tree, node, label),
            Command::SetReturnValue { node, value } => {
                self.engine.update_return_value(&self.tree, node, value)
            }
            Command::ToggleExpanded { node } => self.engine.toggle_expanded(&self.tree, node),
            Command::Show => return Outcome::NoOp,
        };

        if next.ptr_eq(&self.tree) {
            debug!("no-op: {:?}", command);
            return Outcome::NoOp;
        }
        self.tree = next;
        info!("applied {:?}, tree has {} nodes", command, self.tree.len());
        Outcome::Applied
    }

    /// Parse a whole script up front so a typo never leaves it half applied.
    pub fn parse_script(script: &str) -> ApplicationResult<Vec<(usize, Command)>> {
        script
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| match Command::parse_line(line) {
                Ok(Some(command)) => Some(Ok((idx + 1, command))),
                Ok(None) => None,
                Err(source) => Some(Err(ApplicationError::Script {
                    line: idx + 1,
                    source,
                })),
            })
            .collect()
    }

    /// Run every command of `script`, calling `on_step` after each one with
    /// the tree as it is after that step.
    #[instrument(level = "debug", skip(self, script, on_step))]
    pub fn run_script<F>(&mut self, script: &str, mut on_step: F) -> ApplicationResult<ScriptSummary>
    where
        F: FnMut(&Step<'_>, &Tree),
    {
        let commands = Self::parse_script(script)?;
        debug!("running {} commands", commands.len());

        let mut summary = ScriptSummary::default();
        for (line, command) in &commands {
            let outcome = self.apply(command);
            if command.is_mutation() {
                match outcome {
                    Outcome::Applied => summary.applied += 1,
                    Outcome::NoOp => summary.no_ops += 1,
                }
            }
            let step = Step {
                line: *line,
                command,
                outcome,
            };
            on_step(&step, &self.tree);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;

    fn session() -> SessionService {
        SessionService::new(Box::new(SequentialIds::default()))
    }

    #[test]
    fn given_fresh_session_when_mutating_without_root_then_no_op() {
        let mut session = session();
        let outcome = session.apply(&Command::AddChild { parent: "n1".into() });
        assert_eq!(outcome, Outcome::NoOp);
        assert!(session.tree().is_empty());
    }

    #[test]
    fn given_root_when_adding_children_then_each_is_applied() {
        let mut session = session();
        assert_eq!(session.apply(&Command::CreateRoot), Outcome::Applied);
        assert_eq!(
            session.apply(&Command::AddChild { parent: "n1".into() }),
            Outcome::Applied
        );
        assert_eq!(session.tree().len(), 2);
    }

    #[test]
    fn given_show_when_applied_then_tree_is_untouched() {
        let mut session = session();
        session.apply(&Command::CreateRoot);
        let before = session.tree().clone();
        assert_eq!(session.apply(&Command::Show), Outcome::NoOp);
        assert!(before.ptr_eq(session.tree()));
    }

    #[test]
    fn given_bad_line_when_parsing_script_then_reports_line_number() {
        let err = SessionService::parse_script("root\n\nadd n1\nfrobnicate n1\n").unwrap_err();
        match err {
            ApplicationError::Script { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn given_bad_line_when_running_script_then_nothing_is_applied() {
        let mut session = session();
        let result = session.run_script("root\nadd\n", |_, _| {});
        assert!(result.is_err());
        assert!(session.tree().is_empty());
    }
}
