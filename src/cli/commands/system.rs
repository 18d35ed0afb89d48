use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::schema::FieldKind;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("steps", "List the form types in order", "steps", cmd_steps),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_steps(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Form types");
    for (idx, step) in context.engine.definition().steps().iter().enumerate() {
        output::data(format!(
            "  {}. {} ({})",
            idx + 1,
            step.step_id,
            step.display_title()
        ));
        for field in &step.fields {
            let detail = match &field.kind {
                FieldKind::Choice { options } => format!("choice: {}", options.join(", ")),
                other => other.name().to_string(),
            };
            output::data(format!("       - {} [{}]", field.name, detail));
        }
    }
    output::hint("Only the first form type can be selected; the rest follow in order.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(meta.summary());
    output::data(format!("  Version    : {}", meta.version));
    output::data(format!(
        "  Build hash : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::data(format!("  Built at   : {}", meta.timestamp));
    output::data(format!("  Target     : {}", meta.target));
    output::data(format!("  Profile    : {}", meta.profile));
    output::data(format!("  Rustc      : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => {
                output::section(entry.name);
                output::data(format!("  {}", entry.description));
                output::data(format!("  Usage: {}", entry.usage));
                if !entry.aliases.is_empty() {
                    output::data(format!("  Aliases: {}", entry.aliases.join(", ")));
                }
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Commands");
    let width = context
        .registry
        .list()
        .iter()
        .map(|entry| entry.usage.len())
        .max()
        .unwrap_or(0);
    for entry in context.registry.list() {
        output::data(format!(
            "  {:<width$}  {}",
            entry.usage,
            entry.description,
            width = width
        ));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
