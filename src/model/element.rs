//! Elements read back from the catalog server

use super::properties::{
    DatabaseColumnProperties, DatabasePrimaryKeyProperties, DatabaseProperties,
    DatabaseSchemaProperties, DatabaseTableProperties,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Zone name that makes an element visible to general consumers
pub const PUBLISHED_ZONE: &str = "published";

/// Visibility zone of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Draft,
    Published,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementType {
    #[serde(default)]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVersions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementHeader {
    pub guid: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zone_membership: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<ElementVersions>,
}

impl ElementHeader {
    pub fn zone(&self) -> Zone {
        if self.zone_membership.iter().any(|z| z == PUBLISHED_ZONE) {
            Zone::Published
        } else {
            Zone::Draft
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.element_type.as_ref().map(|t| t.type_name.as_str())
    }
}

/// An element as returned by single and list reads.
///
/// The server names the properties field after the element type
/// (`databaseProperties`, `databaseSchemaProperties`, ...); all of those
/// are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogElement<P> {
    pub element_header: ElementHeader,
    #[serde(
        alias = "databaseProperties",
        alias = "databaseSchemaProperties",
        alias = "databaseTableProperties",
        alias = "databaseViewProperties",
        alias = "databaseColumnProperties",
        alias = "databaseDerivedColumnProperties"
    )]
    pub properties: P,
    /// Present on columns carrying the primary key decoration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_properties: Option<DatabasePrimaryKeyProperties>,
}

impl<P> CatalogElement<P> {
    pub fn guid(&self) -> &str {
        &self.element_header.guid
    }
}

pub type DatabaseElement = CatalogElement<DatabaseProperties>;
pub type DatabaseSchemaElement = CatalogElement<DatabaseSchemaProperties>;
pub type DatabaseTableElement = CatalogElement<DatabaseTableProperties>;
pub type DatabaseViewElement = CatalogElement<DatabaseTableProperties>;
pub type DatabaseColumnElement = CatalogElement<DatabaseColumnProperties>;
