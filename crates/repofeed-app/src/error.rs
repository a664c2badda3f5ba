//! # Design
//!
//! - Centralize application-level errors for bootstrap and the list session.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: repofeed_config::ConfigError,
    },
    /// Transport construction failed.
    #[error("transport operation failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Source transport error.
        source: repofeed_client::TransportError,
    },
    /// Entity store operations failed.
    #[error("store operation failed")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Source store error.
        source: repofeed_store::StoreError,
    },
    /// The tracing subscriber could not be installed.
    #[error("logging initialisation failed")]
    Logging {
        /// Subscriber installation failure, rendered.
        message: String,
    },
}

impl AppError {
    /// Wrap a configuration error with its operation identifier.
    #[must_use]
    pub const fn config(operation: &'static str, source: repofeed_config::ConfigError) -> Self {
        Self::Config { operation, source }
    }

    /// Wrap a transport error with its operation identifier.
    #[must_use]
    pub const fn transport(operation: &'static str, source: repofeed_client::TransportError) -> Self {
        Self::Transport { operation, source }
    }

    /// Wrap a store error with its operation identifier.
    #[must_use]
    pub const fn store(operation: &'static str, source: repofeed_store::StoreError) -> Self {
        Self::Store { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_constant_messages() {
        let err = AppError::store(
            "view_model.new",
            repofeed_store::StoreError::UnknownEntity { id: 1 },
        );
        assert_eq!(err.to_string(), "store operation failed");
    }
}
