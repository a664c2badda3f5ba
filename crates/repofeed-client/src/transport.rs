//! Transport abstraction over the remote repository listing endpoint.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use repofeed_core::RepoId;
use reqwest::Client;
use url::Url;

use crate::error::{TransportError, TransportResult};

/// Query parameter carrying the pagination cursor.
const SINCE_PARAM: &str = "since";

/// Single-attempt fetch of one repository page as raw bytes.
///
/// Implementations perform exactly one request per call; retries belong to
/// [`crate::service::RepoService`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the page after `since`, or the first page when absent.
    async fn fetch(&self, since: Option<RepoId>) -> TransportResult<Bytes>;
}

/// Reqwest-backed transport hitting a configured listing endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for `endpoint` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BuildClient`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::BuildClient { source })?;
        Ok(Self { client, endpoint })
    }

    fn page_url(&self, since: Option<RepoId>) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(since) = since {
            url.query_pairs_mut()
                .append_pair(SINCE_PARAM, &since.to_string());
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, since: Option<RepoId>) -> TransportResult<Bytes> {
        let url = self.page_url(since);
        tracing::debug!(%url, "fetching repository page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::Request { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|source| TransportError::Request { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn transport_for(server: &MockServer) -> Result<HttpTransport> {
        let endpoint = format!("{}/repositories", server.base_url()).parse()?;
        Ok(HttpTransport::new(endpoint, TIMEOUT)?)
    }

    #[tokio::test]
    async fn first_page_omits_since_parameter() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/repositories");
            then.status(200).body("[]");
        });

        let transport = transport_for(&server)?;
        let bytes = transport.fetch(None).await?;

        mock.assert();
        assert_eq!(&bytes[..], b"[]");
        Ok(())
    }

    #[tokio::test]
    async fn continuation_carries_since_parameter() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repositories")
                .query_param("since", "37");
            then.status(200).body("[]");
        });

        let transport = transport_for(&server)?;
        transport.fetch(Some(37)).await?;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/repositories");
            then.status(503);
        });

        let transport = transport_for(&server)?;
        let err = transport
            .fetch(None)
            .await
            .expect_err("expected status error");
        assert!(matches!(err, TransportError::Status { status: 503 }));
        Ok(())
    }
}
