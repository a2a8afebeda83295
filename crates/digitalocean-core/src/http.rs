//! Transport seam and response classification.
//!
//! [`Transport`] is the only place network I/O happens. The default
//! implementation wraps a pooled `reqwest` client; tests substitute a mock or
//! point the default transport at a local API double.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Request, StatusCode};
use std::time::Duration;
use tracing::trace;

use crate::client::ClientConfig;
use crate::error::{ApiError, ApiErrorBody, Error, Result};

/// A completed HTTP exchange, reduced to what classification and decoding need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response status
    pub status: StatusCode,
    /// Raw response body (may be empty)
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status and body.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes fully built requests.
///
/// Implementations perform exactly one round-trip per call and must not
/// retry. Timeouts and cancellation belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response.
    async fn execute(&self, request: Request) -> Result<HttpResponse>;
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport from the HTTP configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig, user_agent: &str) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(10));

        if !config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<HttpResponse> {
        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(%status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

/// Decide success or failure from the status code alone.
///
/// A 2xx response is returned untouched for the caller to decode. Any other
/// status becomes [`Error::Api`] when the body is a `{"id", "message"}`
/// object, or [`Error::UnexpectedResponse`] carrying the raw body otherwise.
///
/// # Errors
///
/// Returns the classified error for every non-2xx status.
pub fn classify_response(response: HttpResponse) -> Result<HttpResponse> {
    if response.status.is_success() {
        return Ok(response);
    }

    let status = response.status.as_u16();
    match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(body) => Err(Error::Api(ApiError::new(body.id, body.message, status))),
        Err(_) => Err(Error::UnexpectedResponse {
            status,
            body: response.body,
        }),
    }
}
