//! The wizard state machine.
//!
//! [`WizardEngine`] owns the form definition, the table of completed rows, and
//! the in-flight [`WizardState`]. Every user event maps to one method; each
//! method either performs a full transition or returns an error and leaves the
//! state exactly as it was.
//!
//! ```text
//! Idle --select_form_type--> StepActive(0, Sequential)
//! StepActive(i, Sequential) --submit_step--> Interstitial(i + 1) | Idle (last step)
//! Interstitial(n) --acknowledge_interstitial--> StepActive(n, Sequential)
//! Idle --edit_row--> StepActive(0, Edit) --submit_step--> Idle
//! ```

mod snapshot;

use std::mem;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::{FormError, Result};
use crate::records::{Record, RecordTable, Row};
use crate::schema::{FormDefinition, StepSchema};
use crate::validation::{validate_step, ValidationError};

pub use snapshot::{TableColumn, TableSnapshot, WizardSnapshot};

/// How the active step was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EntryMode {
    /// Part of a new multi-step submission.
    Sequential,
    /// Re-entry to change an existing row.
    Edit { row_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WizardPhase {
    Idle,
    StepActive { step_index: usize, mode: EntryMode },
    Interstitial { next_step_index: usize },
}

impl WizardPhase {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            WizardPhase::Idle => "idle",
            WizardPhase::StepActive {
                mode: EntryMode::Sequential,
                ..
            } => "filling a step",
            WizardPhase::StepActive {
                mode: EntryMode::Edit { .. },
                ..
            } => "editing a row",
            WizardPhase::Interstitial { .. } => "waiting for confirmation",
        }
    }
}

/// Result of a successful [`WizardEngine::submit_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A non-final step was accepted; the interstitial gate is pending.
    Advanced { next_step_index: usize },
    /// The final step was accepted and a new row was appended.
    Completed { row_index: usize },
    /// An edit was saved into an existing row.
    Saved { row_index: usize },
}

/// Everything the wizard tracks between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    phase: WizardPhase,
    draft: Record,
    accumulated: Record,
    completed_steps: usize,
    pending_error: Option<ValidationError>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            phase: WizardPhase::Idle,
            draft: Record::new(),
            accumulated: Record::new(),
            completed_steps: 0,
            pending_error: None,
        }
    }
}

impl WizardState {
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn draft(&self) -> &Record {
        &self.draft
    }

    pub fn accumulated(&self) -> &Record {
        &self.accumulated
    }

    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    pub fn pending_error(&self) -> Option<&ValidationError> {
        self.pending_error.as_ref()
    }

    fn reset(&mut self) {
        self.phase = WizardPhase::Idle;
        self.draft.clear();
        self.accumulated.clear();
        self.pending_error = None;
    }
}

pub struct WizardEngine {
    definition: FormDefinition,
    table: RecordTable,
    state: WizardState,
}

impl Default for WizardEngine {
    fn default() -> Self {
        Self::new(FormDefinition::standard())
    }
}

impl WizardEngine {
    pub fn new(definition: FormDefinition) -> Self {
        Self::with_table(definition, RecordTable::new())
    }

    pub fn with_table(definition: FormDefinition, table: RecordTable) -> Self {
        Self {
            definition,
            table,
            state: WizardState::default(),
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn phase(&self) -> WizardPhase {
        self.state.phase
    }

    pub fn is_idle(&self) -> bool {
        self.state.phase == WizardPhase::Idle
    }

    /// Schema of the step currently being filled, if any.
    pub fn active_step(&self) -> Option<&StepSchema> {
        match self.state.phase {
            WizardPhase::StepActive { step_index, .. } => self.definition.step_at(step_index).ok(),
            _ => None,
        }
    }

    /// Current position of the row being edited.
    pub fn edit_target(&self) -> Option<usize> {
        match self.state.phase {
            WizardPhase::StepActive {
                mode: EntryMode::Edit { row_id },
                ..
            } => self.table.position_of(row_id),
            _ => None,
        }
    }

    /// Fraction of steps submitted in the current (or just finished) run.
    pub fn progress(&self) -> f64 {
        if self.definition.is_empty() {
            return 0.0;
        }
        self.state.completed_steps as f64 / self.definition.len() as f64
    }

    /// Starts a new sequential run. Only the first step can be selected.
    pub fn select_form_type(&mut self, step_id: &str) -> Result<()> {
        self.require_idle("select a form type")?;
        let index = self
            .definition
            .index_of(step_id)
            .ok_or_else(|| FormError::UnknownStep(step_id.to_string()))?;
        if index != 0 {
            return Err(FormError::StepNotSelectable(step_id.to_string()));
        }

        self.state.reset();
        self.state.completed_steps = 0;
        self.state.phase = WizardPhase::StepActive {
            step_index: 0,
            mode: EntryMode::Sequential,
        };
        tracing::debug!(step = step_id, "sequential run started");
        Ok(())
    }

    /// Stores a raw value in the draft. Values are not validated until the
    /// step is submitted.
    pub fn change_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let WizardPhase::StepActive { step_index, .. } = self.state.phase else {
            return Err(self.unsupported("change a field"));
        };
        let step = self.definition.step_at(step_index)?;
        if !step.has_field(name) {
            return Err(FormError::UnknownField {
                step: step.step_id.clone(),
                field: name.to_string(),
            });
        }
        self.state.draft.insert(name, value);
        Ok(())
    }

    pub fn submit_step(&mut self) -> Result<SubmitOutcome> {
        let WizardPhase::StepActive { step_index, mode } = self.state.phase else {
            return Err(self.unsupported("submit a step"));
        };
        let step = self.definition.step_at(step_index)?;

        if let Err(err) = validate_step(step, &self.state.draft) {
            tracing::warn!(step = %step.step_id, error = %err, "step rejected");
            self.state.pending_error = Some(err.clone());
            return Err(err.into());
        }
        self.state.pending_error = None;

        match mode {
            EntryMode::Edit { row_id } => self.save_edit(row_id),
            EntryMode::Sequential => Ok(self.advance(step_index)),
        }
    }

    pub fn acknowledge_interstitial(&mut self) -> Result<()> {
        let WizardPhase::Interstitial { next_step_index } = self.state.phase else {
            return Err(self.unsupported("acknowledge the confirmation"));
        };
        self.state.draft.clear();
        self.state.phase = WizardPhase::StepActive {
            step_index: next_step_index,
            mode: EntryMode::Sequential,
        };
        Ok(())
    }

    /// Re-opens row `index` on the first step, with the draft seeded from the
    /// whole row.
    pub fn edit_row(&mut self, index: usize) -> Result<()> {
        self.require_idle("edit a row")?;
        let row = self.table.row_at(index)?;
        let row_id = row.id;
        let seed = row.values.clone();

        self.state.reset();
        self.state.draft = seed;
        self.state.completed_steps = 0;
        self.state.phase = WizardPhase::StepActive {
            step_index: 0,
            mode: EntryMode::Edit { row_id },
        };
        tracing::debug!(%row_id, index, "edit started");
        Ok(())
    }

    /// Removes row `index`. Allowed in every phase; an edit of the removed row
    /// is dropped and the wizard returns to idle.
    pub fn delete_row(&mut self, index: usize) -> Result<Row> {
        let removed = self.table.remove_at(index)?;
        if let WizardPhase::StepActive {
            mode: EntryMode::Edit { row_id },
            ..
        } = self.state.phase
        {
            if row_id == removed.id {
                tracing::info!(%row_id, "edited row deleted; edit discarded");
                self.state.reset();
            }
        }
        tracing::info!(row_id = %removed.id, index, "row deleted");
        Ok(removed)
    }

    /// Drops the in-flight run or edit without touching the table.
    pub fn abandon(&mut self) -> Result<()> {
        if self.is_idle() {
            return Err(self.unsupported("abandon"));
        }
        tracing::info!(
            phase = self.state.phase.describe(),
            "wizard abandoned; unsaved values discarded"
        );
        self.state.reset();
        self.state.completed_steps = 0;
        Ok(())
    }

    pub fn current_state(&self) -> WizardSnapshot {
        WizardSnapshot::capture(self)
    }

    pub fn table_snapshot(&self) -> TableSnapshot {
        TableSnapshot::capture(&self.definition, &self.table)
    }

    fn advance(&mut self, step_index: usize) -> SubmitOutcome {
        let draft = mem::take(&mut self.state.draft);
        self.state.accumulated.merge(&draft);
        self.state.completed_steps += 1;

        if step_index >= self.definition.last_index() {
            let record = mem::take(&mut self.state.accumulated);
            let row_index = self.table.append(record);
            self.state.reset();
            tracing::info!(row_index, "submission completed");
            SubmitOutcome::Completed { row_index }
        } else {
            let next_step_index = step_index + 1;
            self.state.phase = WizardPhase::Interstitial { next_step_index };
            tracing::debug!(next_step_index, "step accepted");
            SubmitOutcome::Advanced { next_step_index }
        }
    }

    fn save_edit(&mut self, row_id: Uuid) -> Result<SubmitOutcome> {
        let row_index = self
            .table
            .position_of(row_id)
            .ok_or(FormError::RowNotFound(row_id))?;
        self.table.update_at(row_index, &self.state.draft)?;
        self.state.reset();
        tracing::info!(%row_id, row_index, "edit saved");
        Ok(SubmitOutcome::Saved { row_index })
    }

    fn require_idle(&self, action: &'static str) -> Result<()> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(self.unsupported(action))
        }
    }

    fn unsupported(&self, action: &'static str) -> FormError {
        FormError::UnsupportedTransition {
            action,
            state: self.state.phase.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_transitions_leave_state_untouched() {
        let mut engine = WizardEngine::default();
        let before = engine.state().clone();

        assert!(matches!(
            engine.acknowledge_interstitial(),
            Err(FormError::UnsupportedTransition { state: "idle", .. })
        ));
        assert!(engine.submit_step().is_err());
        assert!(engine.change_field("firstName", "Ann").is_err());
        assert!(engine.abandon().is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn only_first_step_is_selectable() {
        let mut engine = WizardEngine::default();
        assert_eq!(
            engine.select_form_type("addressInfo"),
            Err(FormError::StepNotSelectable("addressInfo".into()))
        );
        assert_eq!(
            engine.select_form_type("nope"),
            Err(FormError::UnknownStep("nope".into()))
        );
        assert!(engine.is_idle());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut engine = WizardEngine::default();
        engine.select_form_type("userInfo").unwrap();
        assert!(matches!(
            engine.change_field("city", "X"),
            Err(FormError::UnknownField { .. })
        ));
        assert!(engine.state().draft().is_empty());
    }

    #[test]
    fn abandon_discards_accumulated_values() {
        let mut engine = WizardEngine::default();
        engine.select_form_type("userInfo").unwrap();
        engine.change_field("firstName", "Ann").unwrap();
        engine.change_field("lastName", "Lee").unwrap();
        engine.change_field("age", "30").unwrap();
        engine.submit_step().unwrap();
        assert!(!engine.state().accumulated().is_empty());

        engine.abandon().unwrap();
        assert!(engine.is_idle());
        assert!(engine.state().accumulated().is_empty());
        assert_eq!(engine.progress(), 0.0);
        assert!(engine.table().is_empty());
    }
}
