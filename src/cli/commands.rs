//! Command dispatch for the calltree binary

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::application::{Outcome, SessionService, Step};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Command, Tree};
use crate::render::{render, RenderOptions};

const SHELL_HELP: &str = "\
commands:
  root                  create a new root (replaces the current tree)
  add <id>              append a child to <id>
  remove <id>           remove <id> and its subtree (alias: rm)
  label <id> [text]     set the label of <id>
  return <id> [text]    set the return value on the edge into <id> (alias: ret)
  toggle <id>           collapse or expand <id>
  show                  print the tree
  help                  print this help
  quit                  leave the shell (alias: exit)";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see calltree --help".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_show(&load_settings(cli)?),
            ConfigCommands::Init => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => {
                config_path(cli.config.as_deref());
                Ok(())
            }
        },
        Commands::Run { script, each } => {
            let settings = load_settings(cli)?;
            run(&settings, script.as_deref(), *each)
        }
        Commands::Shell => {
            let settings = load_settings(cli)?;
            shell(&settings)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_ids {
        settings.show_ids = false;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn config_show(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn config_path(explicit: Option<&Path>) {
    output::header("Config files");
    match global_config_path() {
        Some(path) => {
            let state = if path.exists() { "" } else { " (not found)" };
            output::detail(&format!("global:   {}{}", path.display(), state));
        }
        None => output::detail("global:   (no config directory on this platform)"),
    }
    if let Some(path) = explicit {
        output::detail(&format!("explicit: {}", path.display()));
    }
}

#[instrument(skip(settings))]
fn run(settings: &Settings, script: Option<&Path>, each: bool) -> CliResult<()> {
    let text = match script {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("read {}", path.display()), e))?,
        None => io::read_to_string(io::stdin()).map_err(|e| CliError::io("read stdin", e))?,
    };

    let options = RenderOptions::from(settings);
    let mut session = SessionService::from_settings(settings);
    let summary = session.run_script(&text, |step, tree| {
        if prints_after(step, each) {
            output::tree(&render(tree, &options));
        }
    })?;
    info!(
        applied = summary.applied,
        no_ops = summary.no_ops,
        "script finished"
    );

    if !each {
        output::tree(&render(session.tree(), &options));
    }
    if summary.no_ops > 0 {
        output::warning(&format!("{} command(s) had no effect", summary.no_ops));
    }
    Ok(())
}

/// A script step prints the tree for `show`, and with `--each` after every
/// applied mutation.
fn prints_after(step: &Step<'_>, each: bool) -> bool {
    matches!(step.command, Command::Show) || (each && step.outcome == Outcome::Applied)
}

fn no_op_message(command: &Command, tree: &Tree) -> String {
    match command.target() {
        Some(id) if !tree.contains(id) => format!("no node {id}, nothing changed"),
        _ => "nothing changed".to_string(),
    }
}

#[instrument(skip(settings))]
fn shell(settings: &Settings) -> CliResult<()> {
    let options = RenderOptions::from(settings);
    let mut session = SessionService::from_settings(settings);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    output::info("calltree shell, type 'help' for commands");
    loop {
        output::prompt("calltree>");
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| CliError::io("read stdin", e))?;
        if read == 0 {
            break;
        }

        match line.trim() {
            "quit" | "exit" => break,
            "help" => {
                output::info(SHELL_HELP);
                continue;
            }
            _ => {}
        }

        let command = match Command::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output::error(&e);
                continue;
            }
        };

        if !command.is_mutation() {
            output::tree(&render(session.tree(), &options));
            continue;
        }
        match session.apply(&command) {
            Outcome::Applied => output::tree(&render(session.tree(), &options)),
            Outcome::NoOp => output::warning(&no_op_message(&command, session.tree())),
        }
    }
    output::success("bye");
    Ok(())
}
