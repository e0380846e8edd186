//! HTTP client abstraction for testability

use std::time::Duration;

use bytes::Bytes;

use super::types::{FetchRequest, ProviderError};
use crate::cache::BoxFuture;

/// Default request timeout in seconds.
///
/// This is the only timeout in the download path; batches themselves are
/// never time-boxed.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for HTTP requests.
/// Some tile servers reject requests without one.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Status and fully-read body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns true for `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. The status code is returned
/// rather than interpreted so callers decide what counts as success.
pub trait HttpClient: Send + Sync {
    /// Issue a GET for the request and read the whole body.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Http`] on transport failure,
    /// [`ProviderError::BodyRead`] when the body cannot be read.
    fn send<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, ProviderError>>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            let mut builder = self.client.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ProviderError::Http(format!("Request to {} failed: {}", request.url, e)))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| ProviderError::BodyRead(e.to_string()))?;

            Ok(HttpResponse { status, body })
        })
    }
}
