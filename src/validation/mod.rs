//! Step validation.
//!
//! A step is accepted or rejected as a whole. Checks run in layers and the
//! first failing layer decides the error:
//!
//! 1. every required field holds a non-blank value;
//! 2. non-blank values fit their field kind (number, `YYYY-MM-DD` date, or one
//!    of the allowed choices);
//! 3. rules that belong to a specific step, currently the card number and CVV
//!    format of the payment step.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::records::Record;
use crate::schema::{FieldKind, FieldSchema, StepSchema, PAYMENT_INFO};

static CARD_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("card number pattern compiles"));

static CVV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("cvv pattern compiles"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reason a step submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    #[error("{label} must be a valid {expected}")]
    InvalidFieldValue {
        field: String,
        label: String,
        expected: String,
    },
    #[error("Card Number must be numeric.")]
    CardNumberNotNumeric,
    #[error("CVV must be a 3-digit numeric value.")]
    CvvNotThreeDigits,
}

impl ValidationError {
    /// Field names the error refers to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingRequiredFields(fields) => {
                fields.iter().map(String::as_str).collect()
            }
            ValidationError::InvalidFieldValue { field, .. } => vec![field.as_str()],
            ValidationError::CardNumberNotNumeric => vec!["cardNumber"],
            ValidationError::CvvNotThreeDigits => vec!["cvv"],
        }
    }
}

/// Checks `draft` against `step`. Pure: neither argument is modified.
pub fn validate_step(step: &StepSchema, draft: &Record) -> Result<(), ValidationError> {
    check_required(step, draft)?;
    for field in &step.fields {
        if let Some(value) = draft.get(&field.name) {
            check_kind(field, value)?;
        }
    }
    check_step_rules(step, draft)
}

fn check_required(step: &StepSchema, draft: &Record) -> Result<(), ValidationError> {
    let missing: Vec<String> = step
        .fields
        .iter()
        .filter(|field| field.required)
        .filter(|field| is_blank(draft.get(&field.name)))
        .map(|field| field.name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields(missing))
    }
}

fn check_kind(field: &FieldSchema, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let valid = match &field.kind {
        FieldKind::Text => true,
        FieldKind::Number => trimmed
            .parse::<f64>()
            .map(|number| number.is_finite())
            .unwrap_or(false),
        FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok(),
        FieldKind::Choice { options } => options.iter().any(|option| option == trimmed),
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFieldValue {
            field: field.name.clone(),
            label: field.label.clone(),
            expected: expected_description(&field.kind),
        })
    }
}

fn expected_description(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "text value".into(),
        FieldKind::Number => "number".into(),
        FieldKind::Date => "date (YYYY-MM-DD)".into(),
        FieldKind::Choice { options } => format!("choice ({})", options.join(", ")),
    }
}

fn check_step_rules(step: &StepSchema, draft: &Record) -> Result<(), ValidationError> {
    if step.step_id != PAYMENT_INFO {
        return Ok(());
    }

    let card_number = draft.get("cardNumber").map(str::trim).unwrap_or_default();
    if !CARD_NUMBER_PATTERN.is_match(card_number) {
        return Err(ValidationError::CardNumberNotNumeric);
    }

    let cvv = draft.get("cvv").map(str::trim).unwrap_or_default();
    if !CVV_PATTERN.is_match(cvv) {
        return Err(ValidationError::CvvNotThreeDigits);
    }

    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormDefinition;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn reports_every_missing_field_in_schema_order() {
        let definition = FormDefinition::standard();
        let step = definition.step_at(0).unwrap();
        let draft = record(&[("lastName", "Lee"), ("firstName", "   ")]);
        assert_eq!(
            validate_step(step, &draft),
            Err(ValidationError::MissingRequiredFields(vec![
                "firstName".into(),
                "age".into()
            ]))
        );
    }

    #[test]
    fn kind_checks_run_after_required_check() {
        let definition = FormDefinition::standard();
        let step = definition.step_at(0).unwrap();
        let draft = record(&[("firstName", "Ann"), ("lastName", "Lee"), ("age", "thirty")]);
        let err = validate_step(step, &draft).unwrap_err();
        assert_eq!(err.fields(), vec!["age"]);
        assert_eq!(err.to_string(), "Age must be a valid number");
    }

    #[test]
    fn choice_must_match_an_option() {
        let definition = FormDefinition::standard();
        let step = definition.step_at(1).unwrap();
        let draft = record(&[
            ("street", "1 Rd"),
            ("city", "X"),
            ("state", "Ohio"),
            ("zipCode", "00000"),
        ]);
        assert!(matches!(
            validate_step(step, &draft),
            Err(ValidationError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn card_number_rule_precedes_cvv_rule() {
        let definition = FormDefinition::standard();
        let step = definition.step_at(2).unwrap();
        let draft = record(&[
            ("cardNumber", "4111-1111"),
            ("expiryDate", "2030-01-01"),
            ("cvv", "12"),
            ("cardholderName", "Ann Lee"),
        ]);
        assert_eq!(
            validate_step(step, &draft),
            Err(ValidationError::CardNumberNotNumeric)
        );
    }

    #[test]
    fn non_ascii_digits_are_not_numeric() {
        assert!(!CARD_NUMBER_PATTERN.is_match("١٢٣"));
        assert!(CVV_PATTERN.is_match("123"));
        assert!(!CVV_PATTERN.is_match("1234"));
    }
}
