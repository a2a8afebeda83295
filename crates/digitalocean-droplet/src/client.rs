//! Asynchronous droplet client implementation.

use crate::action::{Action, ActionType};
use crate::decode::decode_droplet;
use crate::models::{CreateDropletParams, Droplet};
use crate::Result;
use digitalocean_core::{
    ApiConfig, ClientConfig, DropletId, ServiceClient, ServiceClientBuilder, Transport,
};
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("digitalocean-droplet/", env!("CARGO_PKG_VERSION"));

/// Builder for [`DropletClient`].
pub struct DropletClientBuilder {
    inner: ServiceClientBuilder,
}

impl DropletClientBuilder {
    /// Create a builder for the production endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: ServiceClientBuilder::new(token).with_user_agent(USER_AGENT),
        }
    }

    /// Create a builder from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut inner = ServiceClientBuilder::from_config(config)?;
        if config.user_agent.is_none() {
            inner = inner.with_user_agent(USER_AGENT);
        }
        Ok(Self { inner })
    }

    /// Override the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.inner = self.inner.with_base_url(base_url)?;
        Ok(self)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Use a caller-supplied transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn build(self) -> Result<DropletClient> {
        let inner = self.inner.build()?;
        Ok(DropletClient { inner })
    }
}

/// Asynchronous droplet client.
///
/// Every operation is a single request/response exchange. Failures are
/// returned as-is, wrapped with the operation name; nothing is retried.
#[derive(Clone, Debug)]
pub struct DropletClient {
    inner: ServiceClient,
}

impl DropletClient {
    /// Construct a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        DropletClientBuilder::new(token).build()
    }

    /// Construct a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        DropletClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Create a droplet and return its id.
    ///
    /// Only the id is extracted; follow with
    /// [`retrieve_droplet`](Self::retrieve_droplet) for the full entity.
    pub async fn create_droplet(&self, params: &CreateDropletParams) -> Result<DropletId> {
        debug!(name = %params.name, region = %params.region, "creating droplet");
        let created = async {
            let response = self
                .inner
                .execute(Method::POST, "droplets", &params.to_pairs())
                .await?;
            decode_droplet(&response.body)
        };
        created
            .await
            .map(|droplet| droplet.id)
            .map_err(|err| err.during("creating droplet"))
    }

    /// Fetch a droplet by id.
    pub async fn retrieve_droplet(&self, id: DropletId) -> Result<Droplet> {
        debug!(droplet_id = %id, "retrieving droplet");
        let path = format!("droplets/{id}");
        let fetched = async {
            let response = self.inner.execute(Method::GET, &path, &[]).await?;
            decode_droplet(&response.body)
        };
        fetched.await.map_err(|err| err.during("retrieving droplet"))
    }

    /// Destroy a droplet. Any response body is ignored.
    pub async fn destroy_droplet(&self, id: DropletId) -> Result<()> {
        debug!(droplet_id = %id, "destroying droplet");
        let path = format!("droplets/{id}");
        self.inner
            .execute(Method::DELETE, &path, &[])
            .await
            .map(|_| ())
            .map_err(|err| err.during("destroying droplet"))
    }

    /// Queue an action against a droplet.
    ///
    /// Returns once the API has accepted the action; it does not wait for
    /// the action to complete.
    pub async fn perform_action(&self, id: DropletId, action: &Action) -> Result<()> {
        debug!(droplet_id = %id, action = %action.action_type(), "queueing droplet action");
        let path = format!("droplets/{id}/actions");
        self.inner
            .execute(Method::POST, &path, &action.to_pairs())
            .await
            .map(|_| ())
            .map_err(|err| err.during("processing droplet action"))
    }

    /// Resize to the given size slug.
    pub async fn resize(&self, id: DropletId, size: &str) -> Result<()> {
        self.perform_action(id, &Action::resize(size)).await
    }

    /// Rename the droplet.
    pub async fn rename(&self, id: DropletId, name: &str) -> Result<()> {
        self.perform_action(id, &Action::rename(name)).await
    }

    /// Power the droplet on.
    pub async fn power_on(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::PowerOn.into()).await
    }

    /// Power the droplet off (hard).
    pub async fn power_off(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::PowerOff.into()).await
    }

    /// Shut the droplet down gracefully.
    pub async fn shutdown(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::Shutdown.into()).await
    }

    /// Reboot the droplet gracefully.
    pub async fn reboot(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::Reboot.into()).await
    }

    /// Power-cycle the droplet (hard).
    pub async fn power_cycle(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::PowerCycle.into()).await
    }

    /// Enable IPv6 networking.
    pub async fn enable_ipv6(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::EnableIpv6.into()).await
    }

    /// Enable private networking.
    pub async fn enable_private_networking(&self, id: DropletId) -> Result<()> {
        self.perform_action(id, &ActionType::EnablePrivateNetworking.into())
            .await
    }
}
