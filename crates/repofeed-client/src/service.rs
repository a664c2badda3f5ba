//! Retrying fetch+decode pipeline over a [`Transport`].

use std::time::Duration;

use repofeed_core::{RepoId, Repository};
use tokio::time::sleep;
use tracing::warn;

use crate::decode::decode_repositories;
use crate::error::{DecodeError, FetchError, FetchResult, TransportError};
use crate::transport::Transport;

/// Bounded-retry policy applied to every page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first.
    pub attempts: u32,
    /// Fixed pause between consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(250),
        }
    }
}

enum AttemptError {
    Transport(TransportError),
    Decode(DecodeError),
}

/// Page-loading service combining transport, decoder, and retry.
///
/// Retries cover only the fetch+decode step; store ingestion happens outside
/// this type and cannot fail.
pub struct RepoService<T> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> RepoService<T> {
    /// Wrap a transport with the default retry policy.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_retry(transport, RetryPolicy::default())
    }

    /// Wrap a transport with an explicit retry policy.
    ///
    /// # Panics
    ///
    /// Panics if the policy allows zero attempts.
    #[must_use]
    pub fn with_retry(transport: T, retry: RetryPolicy) -> Self {
        assert!(retry.attempts > 0, "retry policy must allow at least one attempt");
        Self { transport, retry }
    }

    /// Load the page after `since`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] once every attempt has failed; the error carries
    /// the final attempt's cause and the attempt count.
    pub async fn load_page(&self, since: Option<RepoId>) -> FetchResult<Vec<Repository>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(since).await {
                Ok(page) => return Ok(page),
                Err(cause) if attempt < self.retry.attempts => {
                    match &cause {
                        AttemptError::Transport(source) => {
                            warn!(attempt, error = %source, "page fetch attempt failed; retrying");
                        }
                        AttemptError::Decode(source) => {
                            warn!(attempt, error = %source, "page decode attempt failed; retrying");
                        }
                    }
                    sleep(self.retry.backoff).await;
                }
                Err(AttemptError::Transport(source)) => {
                    return Err(FetchError::Transport {
                        attempts: attempt,
                        source,
                    });
                }
                Err(AttemptError::Decode(source)) => {
                    return Err(FetchError::Decode {
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }

    async fn attempt(&self, since: Option<RepoId>) -> Result<Vec<Repository>, AttemptError> {
        let bytes = self
            .transport
            .fetch(since)
            .await
            .map_err(AttemptError::Transport)?;
        decode_repositories(&bytes).map_err(AttemptError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    const FAST_RETRY: RetryPolicy = RetryPolicy {
        attempts: 3,
        backoff: Duration::from_millis(1),
    };

    /// Transport returning a scripted sequence of responses.
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<&'static [u8], TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        const fn new(responses: Vec<Result<&'static [u8], TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch(&self, _since: Option<RepoId>) -> Result<Bytes, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().expect("script mutex poisoned");
            assert!(!responses.is_empty(), "transport called past the script");
            responses
                .remove(0)
                .map(Bytes::from_static)
        }
    }

    const fn status_error() -> TransportError {
        TransportError::Status { status: 502 }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let transport = ScriptedTransport::new(vec![
            Err(status_error()),
            Err(status_error()),
            Ok(br#"[{"id": 5, "private": false, "fork": false}]"#),
        ]);
        let service = RepoService::with_retry(transport, FAST_RETRY);

        let page = service.load_page(None).await.expect("page should load");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 5);
        assert_eq!(service.transport.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let transport = ScriptedTransport::new(vec![
            Err(status_error()),
            Err(status_error()),
            Err(status_error()),
        ]);
        let service = RepoService::with_retry(transport, FAST_RETRY);

        let err = service
            .load_page(Some(10))
            .await
            .expect_err("all attempts should fail");
        assert_eq!(err.attempts(), 3);
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(service.transport.calls(), 3);
    }

    #[tokio::test]
    async fn decode_failures_are_retried_too() {
        let transport = ScriptedTransport::new(vec![
            Ok(b"{\"oops\": 1}".as_slice()),
            Ok(b"[]".as_slice()),
        ]);
        let service = RepoService::with_retry(transport, FAST_RETRY);

        let page = service.load_page(None).await.expect("second attempt succeeds");
        assert!(page.is_empty());
        assert_eq!(service.transport.calls(), 2);
    }
}
