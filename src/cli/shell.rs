//! Line loops for the interactive shell and for script mode.

use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, history::DefaultHistory, Cmd, Editor, KeyEvent};
use shell_words::{split, ParseError};

use crate::cli::completion::FormCompleter;
use crate::cli::core::{CliError, CommandError, LoopControl};
use crate::cli::output;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::wizard::WizardPhase;

/// When set, commands are read from stdin without prompts or confirmations.
pub const SCRIPT_ENV: &str = "DYNAMIC_FORM_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, steps = context.engine.definition().len(), "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor: Editor<FormCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(FormCompleter::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Type `select userInfo` to start a new entry, or `help` for all commands.");

    while context.running {
        if let Some(completer) = editor.helper_mut() {
            completer.track_step(context.engine.active_step());
        }

        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            // Enter on the confirmation screen continues to the next step.
            if matches!(context.engine.phase(), WizardPhase::Interstitial { .. }) {
                run_line(context, "ok")?;
            }
            continue;
        }
        let _ = editor.add_history_entry(line);
        run_line(context, line)?;
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(context, line)?;
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Executes one line and reports command failures. Only errors that should
/// end the shell are returned.
fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    if let Err(err) = execute(context, line) {
        context.report_error(err)?;
    }
    Ok(())
}

pub(crate) fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read that line: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    context.last_command = Some(line.to_string());
    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Splits a line into words; quotes keep values such as `"New York"` whole.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input)
}
