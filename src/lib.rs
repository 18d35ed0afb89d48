#![doc(test(attr(deny(warnings))))]

//! Dynamic Form collects a record through a fixed sequence of form steps,
//! validates each step, and keeps an editable in-memory table of completed
//! records.
//!
//! The [`wizard::WizardEngine`] is the entry point; renderers read its
//! [`wizard::WizardSnapshot`] and [`wizard::TableSnapshot`] projections.

pub mod cli;
pub mod config;
pub mod errors;
pub mod records;
pub mod schema;
pub mod utils;
pub mod validation;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Dynamic Form tracing initialized.");
    });
}
