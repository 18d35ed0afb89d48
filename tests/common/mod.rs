#![allow(dead_code)]

use dynamic_form::wizard::{SubmitOutcome, WizardEngine};

pub const USER: &[(&str, &str)] = &[("firstName", "Ann"), ("lastName", "Lee"), ("age", "30")];

pub const ADDRESS: &[(&str, &str)] = &[
    ("street", "1 Main St"),
    ("city", "Austin"),
    ("state", "Texas"),
    ("zipCode", "73301"),
];

pub const PAYMENT: &[(&str, &str)] = &[
    ("cardNumber", "4111111111111111"),
    ("expiryDate", "2030-01-31"),
    ("cvv", "123"),
    ("cardholderName", "Ann Lee"),
];

/// Writes every pair into the active step's draft.
pub fn fill(engine: &mut WizardEngine, values: &[(&str, &str)]) {
    for (name, value) in values {
        engine
            .change_field(name, *value)
            .unwrap_or_else(|err| panic!("set {name}: {err}"));
    }
}

/// Drives one complete sequential run and returns the new row's index.
pub fn run_full_submission(engine: &mut WizardEngine) -> usize {
    engine.select_form_type("userInfo").expect("select userInfo");
    fill(engine, USER);
    engine.submit_step().expect("submit userInfo");
    engine.acknowledge_interstitial().expect("continue to addressInfo");
    fill(engine, ADDRESS);
    engine.submit_step().expect("submit addressInfo");
    engine.acknowledge_interstitial().expect("continue to paymentInfo");
    fill(engine, PAYMENT);
    match engine.submit_step().expect("submit paymentInfo") {
        SubmitOutcome::Completed { row_index } => row_index,
        other => panic!("expected a completed run, got {other:?}"),
    }
}
