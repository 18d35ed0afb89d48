use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change settings",
        "config [show | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut updated = context.config.clone();
            updated.set(key, &value.join(" "))?;
            let catalog_changed = updated.schema_path != context.config.schema_path;
            context.update_config(updated)?;
            output::success(format!("Updated `{}`.", key));
            if catalog_changed {
                output::hint("The form catalog is reloaded on the next start.");
            }
            Ok(())
        }
        _ => Err(CommandError::usage("config [show | set <key> <value>]")),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::data(format!(
        "  schema_path    : {}",
        config.schema_path.as_deref().unwrap_or("(built-in)")
    ));
    output::data(format!("  plain_mode     : {}", config.plain_mode));
    output::data(format!("  quiet_mode     : {}", config.quiet_mode));
    output::data(format!("  confirm_delete : {}", config.confirm_delete));
    output::data(format!(
        "  file           : {}",
        context.config_manager.path().display()
    ));
    Ok(())
}
