//! Error types for configuration loading and validation.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Name of the setting that failed.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Build an invalid-field error with the offending value captured.
    #[must_use]
    pub fn invalid(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: Some(value.into()),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_captures_context() {
        let err = ConfigError::invalid("retry_attempts", "0", "must be positive");
        let ConfigError::InvalidField {
            field,
            value,
            reason,
        } = err;
        assert_eq!(field, "retry_attempts");
        assert_eq!(value.as_deref(), Some("0"));
        assert_eq!(reason, "must be positive");
    }
}
