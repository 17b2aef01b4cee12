//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lens_core::config::ObservabilityConfig;

/// Environment variable holding per-crate log directives.
/// Format: `LENS_LOG=lens_graph=debug,lens_storage=warn`
pub const LOG_ENV_VAR: &str = "LENS_LOG";

const FALLBACK_FILTER: &str = "lens=info";

static INIT: Once = Once::new();

/// Initialize human-readable logging.
///
/// Reads `LENS_LOG`; falls back to `lens=info` when it is unset or invalid.
/// Only the first `init_*` call in a process installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));
    install(filter, false);
}

/// Initialize with an explicit filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter), false);
}

/// Initialize from the `[observability]` config section. `LENS_LOG` still
/// wins over the configured level when set.
pub fn init_from_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config_directive(config)));
    install(filter, config.json);
}

fn config_directive(config: &ObservabilityConfig) -> String {
    format!("lens={}", config.log_level.trim().to_ascii_lowercase())
}

fn install(filter: EnvFilter, json: bool) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        // Another subscriber may already be installed by the host process;
        // in that case keep it.
        let result = if json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .try_init()
        };
        if let Err(err) = result {
            eprintln!("lens: tracing subscriber not installed: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_level_becomes_a_crate_prefix_directive() {
        let config = ObservabilityConfig {
            log_level: " DEBUG ".into(),
            json: false,
        };
        assert_eq!(config_directive(&config), "lens=debug");
        assert!(EnvFilter::try_new(config_directive(&config)).is_ok());
    }
}
