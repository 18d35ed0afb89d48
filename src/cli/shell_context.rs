//! Shared runtime state for CLI interactions and command execution.

use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    errors::FormError,
    schema::FormDefinition,
    utils::persistence,
    wizard::{EntryMode, WizardEngine, WizardPhase},
};

use super::commands;
use super::core::{CliError, CommandError, LoopControl};
use super::output::{self, set_preferences, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub engine: WizardEngine,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        Self::with_config(mode, config_manager, config)
    }

    pub fn with_config(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
    ) -> Result<Self, CliError> {
        apply_preferences(&config);
        let definition = load_definition(&config)?;

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }

        Ok(Self {
            mode,
            registry,
            engine: WizardEngine::new(definition),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    /// Persists `config` and applies the output preferences immediately.
    /// A changed catalog only takes effect on the next start.
    pub fn update_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.config_manager.save(&config)?;
        apply_preferences(&config);
        self.config = config;
        Ok(())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let marker = match self.engine.phase() {
            WizardPhase::Idle => String::new(),
            WizardPhase::StepActive {
                mode: EntryMode::Edit { .. },
                ..
            } => match self.engine.edit_target() {
                Some(index) => format!(" [edit row {}]", index + 1),
                None => " [edit]".to_string(),
            },
            WizardPhase::StepActive { .. } => {
                let snapshot = self.engine.current_state();
                let step = snapshot
                    .step
                    .as_ref()
                    .map(|step| step.step_id.as_str())
                    .unwrap_or("?");
                format!(" [{} {}%]", step, snapshot.progress_percent())
            }
            WizardPhase::Interstitial { .. } => " [confirm: type ok]".to_string(),
        };
        format!("dynamic-form{}> ", marker)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            tracing::debug!(command, "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.engine.is_idle() {
            "Exit shell?"
        } else {
            "Exit shell and discard the form in progress?"
        };
        Ok(self.ask(prompt)?)
    }

    /// Asks before destructive actions; script runs never prompt.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script || !self.config.confirm_delete {
            return Ok(true);
        }
        Ok(self.ask(prompt)?)
    }

    fn ask(&self, prompt: &str) -> Result<bool, dialoguer::Error> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(FormError::Validation(err)) => {
                self.print_error(&err.to_string());
                output::hint("Fix the values with `set` and run `submit` again.");
                Ok(())
            }
            CommandError::Core(err @ FormError::UnsupportedTransition { .. }) => {
                self.print_error(&err.to_string());
                output::hint("Run `status` to see what the form expects next.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }
}

fn apply_preferences(config: &Config) {
    if config.plain_mode {
        colored::control::set_override(false);
    } else {
        colored::control::unset_override();
    }
    set_preferences(OutputPreferences {
        plain_mode: config.plain_mode,
        quiet_mode: config.quiet_mode,
    });
}

fn load_definition(config: &Config) -> Result<FormDefinition, FormError> {
    match config.schema_path.as_deref() {
        Some(path) => persistence::load_definition_from_file(Path::new(path)),
        None => Ok(FormDefinition::standard()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell::execute;
    use tempfile::TempDir;

    fn script_context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            plain_mode: true,
            ..Config::default()
        };
        let context = ShellContext::with_config(CliMode::Script, manager, config).unwrap();
        (context, temp)
    }

    #[test]
    fn commands_drive_the_engine() {
        let (mut context, _temp) = script_context();
        execute(&mut context, "select userInfo").unwrap();
        execute(&mut context, "set firstName Ann").unwrap();
        execute(&mut context, "set lastName Lee").unwrap();
        execute(&mut context, "set age 30").unwrap();
        execute(&mut context, "submit").unwrap();
        assert_eq!(
            context.engine.phase(),
            WizardPhase::Interstitial { next_step_index: 1 }
        );
        assert_eq!(context.prompt(), "dynamic-form [confirm: type ok]> ");

        execute(&mut context, "ok").unwrap();
        assert_eq!(context.prompt(), "dynamic-form [addressInfo 33%]> ");
    }

    #[test]
    fn exit_and_unknown_commands() {
        let (mut context, _temp) = script_context();
        assert_eq!(execute(&mut context, "slect").unwrap(), LoopControl::Continue);
        assert_eq!(execute(&mut context, "quit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn failed_submit_surfaces_validation_error() {
        let (mut context, _temp) = script_context();
        execute(&mut context, "select userInfo").unwrap();
        let err = execute(&mut context, "submit").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(FormError::Validation(_))
        ));
        assert!(context.engine.state().pending_error().is_some());
    }
}
