//! Tracing initialization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Environment variable holding per-target log filters,
/// e.g. `CODESCOPE_LOG=codescope_storage=debug,codescope_retrieval=info`.
pub const LOG_ENV_VAR: &str = "CODESCOPE_LOG";

/// Initialize human-readable logging.
///
/// Reads `CODESCOPE_LOG`; falls back to `codescope=info` if it is unset or
/// invalid. Idempotent, and a no-op if the host already installed a global
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter("info"))
        .try_init();
}

/// Initialize structured JSON logging. A no-op if any global subscriber is
/// already set.
pub fn init_tracing_json() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .with(env_filter("info"))
        .try_init();
}

/// Initialize logging from the observability section of the config.
pub fn init_from_config(config: &ObservabilityConfig) {
    let filter = env_filter(&config.log_level);
    let installed = if config.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("global subscriber already set; keeping it");
    }
}

fn env_filter(fallback_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("codescope={fallback_level}")))
}
