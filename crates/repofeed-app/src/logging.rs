//! Tracing subscriber installation for the binary.

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AppError, AppResult};

/// Install the global subscriber, preferring `RUST_LOG` over the configured
/// level.
///
/// # Errors
///
/// Returns [`AppError::Logging`] when a subscriber is already installed.
pub fn init_logging(level: &str) -> AppResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|err| AppError::Logging {
            message: err.to_string(),
        })
}
