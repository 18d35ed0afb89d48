use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::{form_view, table_renderer::Table};
use crate::wizard::{SubmitOutcome, WizardPhase};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "select",
            "Start a new entry with the first form type",
            "select <formType>",
            cmd_select,
        )
        .with_aliases(&["start"]),
        CommandEntry::new(
            "set",
            "Set a field on the current form",
            "set <field> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "submit",
            "Validate and submit the current form",
            "submit",
            cmd_submit,
        ),
        CommandEntry::new(
            "ok",
            "Continue to the next form after a step was accepted",
            "ok",
            cmd_ok,
        ),
        CommandEntry::new(
            "abandon",
            "Discard the entry or edit in progress",
            "abandon",
            cmd_abandon,
        )
        .with_aliases(&["cancel"]),
        CommandEntry::new(
            "status",
            "Show the current form, values, and progress",
            "status",
            cmd_status,
        ),
    ]
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step_id = args
        .first()
        .ok_or_else(|| CommandError::usage("select <formType>"))?;
    context.engine.select_form_type(step_id)?;
    show_active_step(context);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::usage("set <field> <value>"))?;
    let raw = rest.join(" ");

    let value = context
        .engine
        .active_step()
        .and_then(|step| step.field(name))
        .and_then(|field| field.options())
        .map(|options| resolve_choice(options, &raw))
        .unwrap_or(raw);

    context.engine.change_field(name, value.clone())?;
    output::success(format!("{} = {}", name, value));
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.engine.submit_step()? {
        SubmitOutcome::Advanced { .. } => {
            output::success("Step saved.");
            form_view::print_progress(&context.engine.current_state());
            form_view::print_interstitial();
        }
        SubmitOutcome::Completed { row_index } => {
            output::success(format!("Submission complete. Row {} added.", row_index + 1));
            form_view::print_progress(&context.engine.current_state());
        }
        SubmitOutcome::Saved { row_index } => {
            output::success(format!(
                "Changes saved successfully (row {}).",
                row_index + 1
            ));
            output::data(Table::from_snapshot(&context.engine.table_snapshot()).render());
        }
    }
    Ok(())
}

fn cmd_ok(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.engine.acknowledge_interstitial()?;
    show_active_step(context);
    Ok(())
}

fn cmd_abandon(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.engine.abandon()?;
    output::warning("Entry discarded. Nothing was saved.");
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.engine.current_state();
    match snapshot.phase {
        WizardPhase::Idle => {
            output::info("No form in progress. Use `select <formType>` or `edit <row>`.");
        }
        WizardPhase::Interstitial { .. } => form_view::print_interstitial(),
        WizardPhase::StepActive { .. } => {
            form_view::print_step(&snapshot, context.engine.definition().len());
        }
    }
    form_view::print_progress(&snapshot);
    if let Some(error) = snapshot.pending_error.as_deref() {
        output::warning(format!("Last submit failed: {}", error));
    }
    output::info(format!("Rows in table: {}", context.engine.table().len()));
    Ok(())
}

fn show_active_step(context: &ShellContext) {
    let snapshot = context.engine.current_state();
    form_view::print_step(&snapshot, context.engine.definition().len());
}

/// Accepts a 1-based option number or a case-insensitive option label and
/// returns the canonical option. Anything else is passed through unchanged
/// and left for validation to reject.
fn resolve_choice(options: &[String], input: &str) -> String {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        if let Some(option) = number.checked_sub(1).and_then(|idx| options.get(idx)) {
            return option.clone();
        }
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(trimmed))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Vec<String> {
        vec!["California".into(), "Texas".into(), "New York".into()]
    }

    #[test]
    fn resolve_choice_by_number_or_label() {
        assert_eq!(resolve_choice(&states(), "2"), "Texas");
        assert_eq!(resolve_choice(&states(), "new york"), "New York");
        assert_eq!(resolve_choice(&states(), "Ohio"), "Ohio");
        assert_eq!(resolve_choice(&states(), "0"), "0");
    }
}
