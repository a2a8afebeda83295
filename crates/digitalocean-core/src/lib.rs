//! # digitalocean-core
//!
//! Core types and HTTP plumbing for DigitalOcean API clients.
//!
//! This crate provides the shared error type, strongly-typed ids, the
//! authenticated request builder, response classification and the transport
//! seam used by the resource crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and the structured API error
//! - [`id`] - Numeric id wrappers for API resources
//! - [`query`] - Query-string parameter builder
//! - [`config`] - Deserializable, validated client settings
//! - [`http`] - Transport trait, default `reqwest` transport, response classifier
//! - [`client`] - HTTP configuration and the authenticated service client

#![cfg_attr(not(test), deny(missing_docs))]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod query;

// Re-export commonly used types
pub use client::{ClientConfig, ServiceClient, ServiceClientBuilder, DEFAULT_API_URL};
pub use config::ApiConfig;
pub use error::{ApiError, Error, Result};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use id::{DropletId, ImageId};
