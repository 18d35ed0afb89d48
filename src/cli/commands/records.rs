use std::path::Path;

use crate::cli::commands::parse_row_number;
use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::{form_view, table_renderer::Table};
use crate::utils::persistence;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("table", "Show submitted entries", "table", cmd_table)
            .with_aliases(&["list"]),
        CommandEntry::new(
            "edit",
            "Edit the user information of a submitted entry",
            "edit <row>",
            cmd_edit,
        ),
        CommandEntry::new(
            "delete",
            "Delete a submitted entry",
            "delete <row>",
            cmd_delete,
        ),
        CommandEntry::new(
            "export",
            "Print submitted entries as JSON or write them to a file",
            "export [file.json]",
            cmd_export,
        ),
    ]
}

fn cmd_table(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Submitted Data");
    output::data(Table::from_snapshot(&context.engine.table_snapshot()).render());
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_row_number(args, "edit <row>")?;
    context.engine.edit_row(index)?;
    let snapshot = context.engine.current_state();
    form_view::print_step(&snapshot, context.engine.definition().len());
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_row_number(args, "delete <row>")?;
    // Range check before prompting.
    context.engine.table().row_at(index)?;
    if !context.confirm(&format!("Delete row {}?", index + 1))? {
        output::info("Delete cancelled.");
        return Ok(());
    }

    let was_editing = context.engine.edit_target() == Some(index);
    context.engine.delete_row(index)?;
    output::success("Entry deleted successfully.");
    if was_editing {
        output::warning("The edit in progress was discarded.");
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let snapshot = context.engine.table_snapshot();
    match args.first() {
        Some(path) => {
            persistence::export_table_to_file(&snapshot, Path::new(path))?;
            output::success(format!(
                "Exported {} entries to {}",
                snapshot.len(),
                path
            ));
        }
        None => output::data(serde_json::to_string_pretty(&snapshot)?),
    }
    Ok(())
}
