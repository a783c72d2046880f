//! dbplatform - client for cataloguing relational database assets
//!
//! Databases, schemas, tables, views and columns are described in a remote
//! open metadata server together with their primary keys, foreign key
//! relationships and derived-column query targets. This crate talks to the
//! server's data platform service.
//!
//! # Example
//!
//! ```ignore
//! use dbplatform::{CatalogClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> dbplatform::Result<()> {
//!     let config = ClientConfig::builder("https://localhost:9443", "cocoMDS1").build()?;
//!     let client = CatalogClient::new(config)?;
//!     for db in client.databases().find("erinoverview", "Sales.*", 0, 25).await? {
//!         println!("{} {}", db.guid(), db.properties.qualified_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod model;
pub mod resource;
pub mod validate;

pub use catalog::{CatalogClient, ClientConfig, ClientConfigBuilder, PlatformCredentials};
pub use error::{format_catalog_error, CatalogError, ParameterSource, Result};
pub use model::IntegratorIdentity;
pub use resource::{ResourceKind, Resources};
