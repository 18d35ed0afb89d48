//! Step and field descriptions consumed by the wizard.
//!
//! A [`FormDefinition`] is an ordered list of [`StepSchema`]s; the order is the
//! order in which the wizard walks the steps. Definitions are immutable once
//! built and can be loaded from JSON catalogs (see
//! [`crate::utils::persistence`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{FormError, Result};

pub const USER_INFO: &str = "userInfo";
pub const ADDRESS_INFO: &str = "addressInfo";
pub const PAYMENT_INFO: &str = "paymentInfo";

/// Supported input kinds for form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    #[serde(alias = "dropdown")]
    Choice { options: Vec<String> },
}

impl FieldKind {
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Choice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Choice { .. } => "choice",
        }
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default = "FieldSchema::required_default")]
    pub required: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: true,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Allowed values for choice fields, `None` for every other kind.
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Choice { options } => Some(options),
            _ => None,
        }
    }

    fn required_default() -> bool {
        true
    }
}

/// One page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSchema {
    pub step_id: String,
    #[serde(default)]
    pub title: String,
    pub fields: Vec<FieldSchema>,
}

impl StepSchema {
    pub fn new(
        step_id: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<FieldSchema>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            title: title.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Human readable heading, falling back to the step id.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.step_id
        } else {
            &self.title
        }
    }
}

/// Ordered catalog of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDefinition {
    steps: Vec<StepSchema>,
}

impl FormDefinition {
    /// Builds a definition, rejecting empty catalogs and duplicate field names
    /// inside a step. Names repeated across steps are accepted; later steps
    /// overwrite earlier ones when drafts are merged.
    pub fn new(steps: Vec<StepSchema>) -> Result<Self> {
        if steps.is_empty() {
            return Err(FormError::InvalidDefinition(
                "a form needs at least one step".into(),
            ));
        }

        let mut step_ids = HashSet::new();
        let mut seen_across_steps = HashSet::new();
        for step in &steps {
            if !step_ids.insert(step.step_id.as_str()) {
                return Err(FormError::InvalidDefinition(format!(
                    "step `{}` is defined more than once",
                    step.step_id
                )));
            }
            let mut names = HashSet::new();
            for field in &step.fields {
                if !names.insert(field.name.as_str()) {
                    return Err(FormError::InvalidDefinition(format!(
                        "field `{}` appears twice in step `{}`",
                        field.name, step.step_id
                    )));
                }
                if !seen_across_steps.insert(field.name.as_str()) {
                    tracing::warn!(
                        field = %field.name,
                        step = %step.step_id,
                        "field name reused across steps; later values overwrite earlier ones"
                    );
                }
            }
        }

        Ok(Self { steps })
    }

    /// The fixed three-step catalog: user, address, then payment details.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                StepSchema::new(
                    USER_INFO,
                    "User Information",
                    vec![
                        FieldSchema::new("firstName", "First Name", FieldKind::Text),
                        FieldSchema::new("lastName", "Last Name", FieldKind::Text),
                        FieldSchema::new("age", "Age", FieldKind::Number),
                    ],
                ),
                StepSchema::new(
                    ADDRESS_INFO,
                    "Address Information",
                    vec![
                        FieldSchema::new("street", "Street", FieldKind::Text),
                        FieldSchema::new("city", "City", FieldKind::Text),
                        FieldSchema::new(
                            "state",
                            "State",
                            FieldKind::choice(["California", "Texas", "New York"]),
                        ),
                        FieldSchema::new("zipCode", "Zip Code", FieldKind::Text),
                    ],
                ),
                StepSchema::new(
                    PAYMENT_INFO,
                    "Payment Information",
                    vec![
                        FieldSchema::new("cardNumber", "Card Number", FieldKind::Text),
                        FieldSchema::new("expiryDate", "Expiry Date", FieldKind::Date),
                        FieldSchema::new("cvv", "CVV", FieldKind::Text),
                        FieldSchema::new("cardholderName", "Cardholder Name", FieldKind::Text),
                    ],
                ),
            ],
        }
    }

    pub fn step_at(&self, index: usize) -> Result<&StepSchema> {
        self.steps.get(index).ok_or(FormError::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    pub fn index_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.step_id == step_id)
    }

    pub fn steps(&self) -> &[StepSchema] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Every field of every step, steps in definition order.
    pub fn all_fields(&self) -> Vec<&FieldSchema> {
        self.steps.iter().flat_map(|step| step.fields.iter()).collect()
    }
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for FormDefinition {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            steps: Vec<StepSchema>,
        }

        let raw = Raw::deserialize(deserializer)?;
        FormDefinition::new(raw.steps).map_err(serde::de::Error::custom)
    }
}
