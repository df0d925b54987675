#![doc(test(attr(deny(warnings))))]

//! Intake Core offers wizard schema, session-state, and navigation-gating
//! primitives that power multi-step data-entry flows and the CLI built on
//! them.

pub mod cli;
pub mod config;
pub mod errors;
pub mod schema;
pub mod session;
pub mod storage;

mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("intake_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Intake Core tracing initialized.");
    });
}
