//! Text rendering of the wizard state: the active step, progress, and the
//! confirmation gate between steps.

use crate::cli::output::{self, current_preferences};
use crate::schema::{FieldKind, StepSchema};
use crate::wizard::{EntryMode, WizardPhase, WizardSnapshot};

const PROGRESS_WIDTH: usize = 20;
pub const INTERSTITIAL_MESSAGE: &str = "Please fill the next form to complete your submission.";

/// `[######--------------] 33%` style bar; `fraction` is clamped to `0..=1`.
pub fn progress_bar(fraction: f64, width: usize, plain: bool) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * width as f64).round() as usize;
    let (full, empty) = if plain { ('#', '-') } else { ('█', '░') };
    format!(
        "[{}{}] {}%",
        full.to_string().repeat(filled),
        empty.to_string().repeat(width - filled),
        (fraction * 100.0).round() as u32
    )
}

/// One line per field: label, name, kind, requirement, and current value.
pub fn field_lines(step: &StepSchema, snapshot: &WizardSnapshot) -> Vec<String> {
    step.fields
        .iter()
        .map(|field| {
            let value = snapshot.draft.get(&field.name).unwrap_or("");
            let requirement = if field.required { "required" } else { "optional" };
            let kind = match &field.kind {
                FieldKind::Choice { options } => format!("one of: {}", options.join(" | ")),
                other => other.name().to_string(),
            };
            format!(
                "  {:<16} {:<15} [{}, {}] = {}",
                field.label,
                field.name,
                kind,
                requirement,
                if value.is_empty() { "<empty>" } else { value }
            )
        })
        .collect()
}

pub fn print_step(snapshot: &WizardSnapshot, total_steps: usize) {
    let Some(step) = snapshot.step.as_ref() else {
        return;
    };
    let heading = match snapshot.phase {
        WizardPhase::StepActive {
            mode: EntryMode::Edit { .. },
            ..
        } => match snapshot.edit_target {
            Some(index) => format!("Edit row {}: {}", index + 1, step.display_title()),
            None => format!("Edit: {}", step.display_title()),
        },
        WizardPhase::StepActive { step_index, .. } => format!(
            "{} (step {} of {})",
            step.display_title(),
            step_index + 1,
            total_steps
        ),
        _ => step.display_title().to_string(),
    };

    output::section(heading);
    for line in field_lines(step, snapshot) {
        output::data(line);
    }
    output::hint("Use `set <field> <value>` then `submit`.");
}

pub fn print_progress(snapshot: &WizardSnapshot) {
    let plain = current_preferences().plain_mode;
    output::info(format!(
        "Progress: {}",
        progress_bar(snapshot.progress, PROGRESS_WIDTH, plain)
    ));
}

pub fn print_interstitial() {
    output::section("Next step");
    output::data(INTERSTITIAL_MESSAGE);
    output::hint("Press Enter or type `ok` to continue.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::WizardEngine;

    #[test]
    fn progress_bar_thirds() {
        assert_eq!(progress_bar(0.0, 6, true), "[------] 0%");
        assert_eq!(progress_bar(1.0 / 3.0, 6, true), "[##----] 33%");
        assert_eq!(progress_bar(2.0 / 3.0, 6, true), "[####--] 67%");
        assert_eq!(progress_bar(1.5, 6, true), "[######] 100%");
    }

    #[test]
    fn field_lines_show_draft_values_and_options() {
        let mut engine = WizardEngine::default();
        engine.select_form_type("userInfo").unwrap();
        engine.change_field("firstName", "Ann").unwrap();
        let snapshot = engine.current_state();
        let step = snapshot.step.clone().unwrap();
        let lines = field_lines(&step, &snapshot);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("First Name") && lines[0].ends_with("= Ann"));
        assert!(lines[2].contains("[number, required] = <empty>"));
    }
}
