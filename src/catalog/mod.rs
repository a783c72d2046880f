//! Catalog server interaction module
//!
//! This module provides the core functionality for talking to the data
//! platform catalog service: platform credentials, the HTTP layer and the
//! client that unwraps response envelopes.
//!
//! # Module Structure
//!
//! - [`auth`] - Platform credentials sent with every request
//! - [`client`] - Main catalog client and its configuration
//! - [`http`] - HTTP utilities and failure classification
//!
//! # Example
//!
//! ```ignore
//! use dbplatform::catalog::{CatalogClient, ClientConfig};
//!
//! async fn example() -> dbplatform::Result<()> {
//!     let config = ClientConfig::builder("https://localhost:9443", "cocoMDS1").build()?;
//!     let client = CatalogClient::new(config)?;
//!     let databases = client.databases().find("erinoverview", ".*", 0, 10).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

pub use auth::PlatformCredentials;
pub use client::{CatalogClient, ClientConfig, ClientConfigBuilder};
