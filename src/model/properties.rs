//! Property objects
//!
//! Views are tables with a defining query and derived columns are columns
//! with a formula and query targets. The variant-only fields are optional
//! and left out of the request body when unset, so both variants share one
//! properties type with their base kind.

use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Properties that every catalogued element carries
pub trait ElementProperties: Serialize {
    fn qualified_name(&self) -> &str;

    /// Kind to address when these properties are written through a handle
    /// for `kind`. Variant fields (a defining query, query targets) select
    /// the variant endpoint.
    fn variant_kind(&self, kind: ResourceKind) -> ResourceKind {
        kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProperties {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_imported_from: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchemaProperties {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// Table or view properties; a view is a table with a defining query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTableProperties {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defining_query: Option<String>,
}

impl DatabaseTableProperties {
    pub fn is_view(&self) -> bool {
        self.defining_query.is_some()
    }
}

/// Column or derived-column properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseColumnProperties {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Expression combining the query targets (derived columns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Ordered links to the values a derived column is computed from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_targets: Vec<DatabaseQueryProperties>,
}

impl DatabaseColumnProperties {
    pub fn is_derived(&self) -> bool {
        self.formula.is_some() || !self.query_targets.is_empty()
    }
}

/// One query target of a derived column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseQueryProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "queryTargetGUID")]
    pub query_target_guid: String,
}

/// How primary key values are allocated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPattern {
    #[default]
    LocalKey,
    RecycledKey,
    NaturalKey,
    MirrorKey,
    AggregateKey,
    CallersKey,
    StableKey,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePrimaryKeyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub key_pattern: KeyPattern,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseForeignKeyProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 0-100, larger values are rejected before sending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

macro_rules! qualified {
    ($($ty:ty),*) => {
        $(impl ElementProperties for $ty {
            fn qualified_name(&self) -> &str {
                &self.qualified_name
            }
        })*
    };
}

qualified!(DatabaseProperties, DatabaseSchemaProperties);

impl ElementProperties for DatabaseTableProperties {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn variant_kind(&self, kind: ResourceKind) -> ResourceKind {
        match kind {
            ResourceKind::Table if self.is_view() => ResourceKind::View,
            other => other,
        }
    }
}

impl ElementProperties for DatabaseColumnProperties {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn variant_kind(&self, kind: ResourceKind) -> ResourceKind {
        match kind {
            ResourceKind::Column if self.is_derived() => ResourceKind::DerivedColumn,
            other => other,
        }
    }
}
