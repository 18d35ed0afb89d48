//! Read-only projections handed to renderers.

use serde::Serialize;

use super::{WizardEngine, WizardPhase};
use crate::records::{Record, RecordTable};
use crate::schema::{FormDefinition, StepSchema};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub phase: WizardPhase,
    pub step: Option<StepSchema>,
    pub draft: Record,
    pub progress: f64,
    pub pending_error: Option<String>,
    pub edit_target: Option<usize>,
}

impl WizardSnapshot {
    pub(super) fn capture(engine: &WizardEngine) -> Self {
        Self {
            phase: engine.phase(),
            step: engine.active_step().cloned(),
            draft: engine.state().draft().clone(),
            progress: engine.progress(),
            pending_error: engine.state().pending_error().map(ToString::to_string),
            edit_target: engine.edit_target(),
        }
    }

    /// Progress as a whole percentage, rounded to the nearest integer.
    pub fn progress_percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub label: String,
}

/// Rows projected onto the flattened column list; missing values are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub(super) fn capture(definition: &FormDefinition, table: &RecordTable) -> Self {
        let columns: Vec<TableColumn> = definition
            .all_fields()
            .into_iter()
            .map(|field| TableColumn {
                name: field.name.clone(),
                label: field.label.clone(),
            })
            .collect();
        let rows = table
            .all_rows()
            .iter()
            .map(|row| project(&row.values, &columns))
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn project(values: &Record, columns: &[TableColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|column| values.get(&column.name).unwrap_or_default().to_string())
        .collect()
}
