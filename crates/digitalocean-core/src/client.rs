//! HTTP client configuration and the shared service client.
//!
//! [`ServiceClient`] owns the base URL, the bearer credential and the
//! transport. It builds authenticated requests, sends them, and classifies
//! the responses; resource crates layer typed operations on top.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Request};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http::{classify_response, HttpResponse, ReqwestTransport, Transport};

/// Production API endpoint, including the version prefix.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
///
/// Applies to the default `reqwest` transport. A transport injected through
/// [`ServiceClientBuilder::with_transport`] ignores it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
pub struct ServiceClientBuilder {
    base_url: Option<Url>,
    token: SecretString,
    http_config: ClientConfig,
    user_agent: String,
    transport: Option<Arc<dyn Transport>>,
}

impl ServiceClientBuilder {
    /// Create a builder for the production endpoint with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: None,
            token: SecretString::from(token.into()),
            http_config: ClientConfig::new(),
            user_agent: concat!("digitalocean-core/", env!("CARGO_PKG_VERSION")).to_string(),
            transport: None,
        }
    }

    /// Create a builder from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation or the URL is invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.check()?;
        let builder = Self::new(config.token().expose_secret())
            .with_base_url(&config.api_url)?
            .with_http_config(config.client_config());
        Ok(match &config.user_agent {
            Some(agent) => builder.with_user_agent(agent.clone()),
            None => builder,
        })
    }

    /// Override the base URL (tests point this at a local API double).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed or is not http(s).
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let url = Url::parse(raw)
            .map_err(|err| Error::ConfigError(format!("Invalid base URL `{raw}`: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "Invalid base URL `{raw}`: unsupported scheme `{}`",
                url.scheme()
            )));
        }
        self.base_url = Some(normalize_base(url));
        Ok(self)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the `User-Agent` sent by the default transport.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a caller-supplied transport instead of the default `reqwest` one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the default transport cannot be created.
    pub fn build(self) -> Result<ServiceClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => normalize_base(Url::parse(DEFAULT_API_URL)?),
        };
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.http_config, &self.user_agent)?),
        };

        Ok(ServiceClient {
            base_url,
            token: Arc::new(self.token),
            transport,
        })
    }
}

/// Authenticated client shared by the resource crates.
///
/// Read-only after construction; clones share the credential and transport.
#[derive(Clone)]
pub struct ServiceClient {
    base_url: Url,
    token: Arc<SecretString>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an authenticated request without sending it.
    ///
    /// Every parameter is encoded in the query string, whatever the method.
    ///
    /// # Errors
    ///
    /// Returns a construction error when the path is malformed or would leave
    /// the base URL.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Request> {
        let mut url = self.build_url(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        }

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                .map_err(|_| {
                    Error::InvalidRequest("token contains invalid header characters".to_string())
                })?;
        bearer.set_sensitive(true);

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(request)
    }

    /// Build, send and classify a request.
    ///
    /// On success the raw response is returned for the caller to decode.
    ///
    /// # Errors
    ///
    /// Returns construction, transport or classified API errors.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, params)?;
        debug!(method = %request.method(), path, params = params.len(), "sending request");
        let response = self.transport.execute(request).await?;
        classify_response(response)
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        if path.contains(['?', '#']) {
            return Err(Error::InvalidRequest(format!(
                "path `{path}` must not carry a query or fragment"
            )));
        }

        let normalized = path.trim_start_matches('/');
        let url = self
            .base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            return Err(Error::InvalidRequest(format!(
                "path `{path}` resolves outside the API base URL"
            )));
        }
        Ok(url)
    }
}

/// Ensure the base path ends in `/` so relative joins keep the version prefix.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}
