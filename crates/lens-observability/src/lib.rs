//! # lens-observability
//!
//! Installs the process-wide `tracing` subscriber. Library crates only emit
//! events; binaries and tests embedding the engine call one of the `init_*`
//! functions once at startup.

pub mod tracing_setup;

pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter, LOG_ENV_VAR};
