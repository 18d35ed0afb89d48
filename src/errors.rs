use std::result::Result as StdResult;

use thiserror::Error;

use crate::validation::ValidationError;

/// Unified error type for the schema, validation, wizard, and record layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Row index {index} is out of range (table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Row {0} no longer exists")]
    RowNotFound(uuid::Uuid),
    #[error("Cannot {action} while {state}")]
    UnsupportedTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("Unknown form type: {0}")]
    UnknownStep(String),
    #[error("Form type `{0}` cannot be selected directly; start from the first step")]
    StepNotSelectable(String),
    #[error("Field `{field}` is not part of step `{step}`")]
    UnknownField { step: String, field: String },
    #[error("Invalid form definition: {0}")]
    InvalidDefinition(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, FormError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FormError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Storage(err.to_string())
    }
}
