//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the database hierarchy.
//! Resource kinds are described in embedded JSON, request targets are
//! derived from those descriptions, and one generic operation set serves
//! every kind.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource kind definitions from embedded JSON
//! - [`path`] - Builds request targets from (kind, operation, identifiers)
//! - [`operations`] - The create/update/zone/remove/search operation set
//! - [`decorations`] - Primary keys, foreign keys, query targets and integrator listing
//!
//! # Example
//!
//! ```ignore
//! use dbplatform::model::{DatabaseSchemaProperties, IntegratorIdentity};
//!
//! async fn add_schema(client: &dbplatform::CatalogClient, db: &str) -> dbplatform::Result<String> {
//!     let integrator = IntegratorIdentity::new("f3b1c8de-6a0e-4f4f-9c42-5a3d2b1e0f77", "pg-daemon");
//!     let props = DatabaseSchemaProperties {
//!         qualified_name: "SalesDB.public".to_string(),
//!         ..Default::default()
//!     };
//!     client.schemas().create("erinoverview", &integrator, Some(db), &props).await
//! }
//! ```

pub mod decorations;
pub mod operations;
pub mod path;
pub mod registry;

pub use operations::Resources;
pub use path::{build_path, compose, AddressError, RequestPath, ResourceOperation, Scope};
pub use registry::{ResourceDef, ResourceKind};
