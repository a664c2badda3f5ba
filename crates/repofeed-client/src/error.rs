//! Error types for the repository fetch pipeline.

use thiserror::Error;

/// Network-level failures from a single transport attempt. Retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to construct the HTTP client.
    #[error("failed to build http client")]
    BuildClient {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be completed.
    #[error("page request failed")]
    Request {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("page request rejected")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
    },
}

/// Result alias for single-attempt transport calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Malformed-payload failures from the decoder. Retryable at the pipeline
/// level; not a data-corruption condition.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not valid JSON.
    #[error("payload is not valid json")]
    Json {
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The top-level JSON value was not an array.
    #[error("payload is not a json array")]
    NotAnArray,
    /// A record was not a JSON object.
    #[error("record is not a json object")]
    RecordShape {
        /// Zero-based position of the record within the page.
        index: usize,
    },
    /// A required field was missing or wrongly typed.
    #[error("required field missing or invalid")]
    RequiredField {
        /// Zero-based position of the record within the page.
        index: usize,
        /// Wire name of the offending field.
        field: &'static str,
    },
}

/// Post-retry pipeline outcome: a page that could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt failed at the transport layer.
    #[error("page fetch failed")]
    Transport {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Failure from the final attempt.
        #[source]
        source: TransportError,
    },
    /// Every attempt failed while decoding the payload.
    #[error("page decode failed")]
    Decode {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Failure from the final attempt.
        #[source]
        source: DecodeError,
    },
}

impl FetchError {
    /// Number of attempts made before the pipeline gave up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Transport { attempts, .. } | Self::Decode { attempts, .. } => *attempts,
        }
    }
}

/// Result alias for the retrying fetch pipeline.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_exposes_attempt_count() {
        let err = FetchError::Decode {
            attempts: 3,
            source: DecodeError::NotAnArray,
        };
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.to_string(), "page decode failed");
    }
}
