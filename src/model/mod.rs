//! Catalog data model
//!
//! Entity definitions exchanged with the catalog server.
//!
//! # Module Structure
//!
//! - [`element`] - Elements read back from the server (header + properties)
//! - [`properties`] - Property objects submitted on create/update and decoration edits
//! - [`rest`] - Request and response envelopes

pub mod element;
pub mod properties;
pub mod rest;

pub use element::*;
pub use properties::*;
pub use rest::*;

use serde::{Deserialize, Serialize};

/// Identity of the software agent recorded as the author of a change.
///
/// Distinct from the end-user `userId`, which decides whether a call is
/// allowed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegratorIdentity {
    pub guid: String,
    pub name: String,
}

impl IntegratorIdentity {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
        }
    }
}
