//! # digitalocean-droplet
//!
//! Client for the DigitalOcean droplet API.
//!
//! ## Features
//!
//! - Create, retrieve and destroy droplets
//! - Queue droplet actions (resize, rename, power management, networking)
//! - Shape-tolerant decoding of droplet entities
//!
//! ## Example
//!
//! ```no_run
//! use digitalocean_droplet::{CreateDropletParams, DropletClient};
//!
//! # async fn example() -> digitalocean_droplet::Result<()> {
//! let client = DropletClient::new("my-token")?;
//!
//! let params = CreateDropletParams::new("web-01", "nyc1", "512mb").with_image("ubuntu-14-04-x64");
//! let id = client.create_droplet(&params).await?;
//!
//! let droplet = client.retrieve_droplet(id).await?;
//! println!("{} is {}", droplet.name, droplet.status());
//!
//! client.resize(id, "1gb").await?;
//! client.destroy_droplet(id).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), deny(missing_docs))]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod client;
pub mod decode;
pub mod models;

pub use action::{Action, ActionType};
pub use client::{DropletClient, DropletClientBuilder};
pub use decode::decode_droplet;
pub use models::{CreateDropletParams, Droplet, ImageRef, IpVersion, Network, NetworkType};

pub use digitalocean_core::{ApiConfig, ApiError, ClientConfig, DropletId, Error, ImageId};

/// Result type for droplet operations.
pub type Result<T> = digitalocean_core::Result<T>;
