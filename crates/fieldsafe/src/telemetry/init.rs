//! Tracing subscriber initialisation.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Writes structured JSON logs to stderr, keeping stdout free for command
/// output. `RUST_LOG` takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive or the
/// subscriber has already been set.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid LOG_LEVEL directive {log_level:?}"))?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
