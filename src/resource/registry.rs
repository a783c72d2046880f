//! Resource Registry - Load resource kind definitions from JSON
//!
//! Every resource kind in the database hierarchy is described once in an
//! embedded JSON table: where it lives in the request path, which kind owns
//! it, and the parameter and operation names used when reporting errors.
//! Request addresses are derived from these entries instead of being written
//! out per operation.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Embedded resource JSON (compiled into the binary)
const RESOURCE_FILE: &str = include_str!("../resources/catalog.json");

/// Resource kind definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    /// Open metadata type name, e.g. `DatabaseSchema`
    pub type_name: String,
    pub display_name: String,
    /// Path of this kind below the caller scope, e.g. `databases/schemas`
    pub path: String,
    /// Key of the owning kind; absent for top-level kinds
    #[serde(default)]
    pub parent: Option<String>,
    /// Segment(s) appended after the parent GUID when creating or listing children
    #[serde(default)]
    pub child_path: Option<String>,
    /// Kind this one is a variant of. Every operation except create and
    /// update addresses the base kind.
    #[serde(default)]
    pub base_kind: Option<String>,
    pub guid_parameter: String,
    pub properties_parameter: String,
    pub find_operation: String,
    pub by_name_operation: String,
    #[serde(default)]
    pub list_operation: Option<String>,
}

/// Root structure of resources/catalog.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(RESOURCE_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e))
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// The structural levels of the database hierarchy, plus their variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Database,
    Schema,
    Table,
    View,
    Column,
    DerivedColumn,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Database,
        ResourceKind::Schema,
        ResourceKind::Table,
        ResourceKind::View,
        ResourceKind::Column,
        ResourceKind::DerivedColumn,
    ];

    /// Registry key
    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Database => "database",
            ResourceKind::Schema => "database-schema",
            ResourceKind::Table => "database-table",
            ResourceKind::View => "database-view",
            ResourceKind::Column => "database-column",
            ResourceKind::DerivedColumn => "database-derived-column",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn def(self) -> &'static ResourceDef {
        get_resource(self.key())
            .unwrap_or_else(|| panic!("resource kind '{}' missing from embedded registry", self.key()))
    }

    pub fn parent(self) -> Option<ResourceKind> {
        self.def().parent.as_deref().and_then(Self::from_key)
    }

    /// The kind addressed by reads, removal and zone changes
    pub fn base(self) -> ResourceKind {
        self.def()
            .base_kind
            .as_deref()
            .and_then(Self::from_key)
            .unwrap_or(self)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.def().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert_eq!(registry.resources.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_every_kind_has_a_definition() {
        for kind in ResourceKind::ALL {
            let def = kind.def();
            assert!(!def.path.is_empty(), "{} has no path", kind.key());
            assert!(def.path.starts_with("databases"));
            assert!(!def.path.starts_with('/') && !def.path.ends_with('/'));
            assert_eq!(ResourceKind::from_key(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_child_kinds_have_parents_and_child_paths() {
        for kind in ResourceKind::ALL {
            let def = kind.def();
            match kind {
                ResourceKind::Database => {
                    assert!(kind.parent().is_none());
                    assert!(def.child_path.is_none());
                }
                _ => {
                    assert!(kind.parent().is_some(), "{} has no parent", kind.key());
                    assert!(def.child_path.is_some(), "{} has no child path", kind.key());
                    assert!(def.list_operation.is_some());
                }
            }
        }
    }

    #[test]
    fn test_hierarchy() {
        assert_eq!(ResourceKind::Schema.parent(), Some(ResourceKind::Database));
        assert_eq!(ResourceKind::Table.parent(), Some(ResourceKind::Schema));
        assert_eq!(ResourceKind::View.parent(), Some(ResourceKind::Schema));
        assert_eq!(ResourceKind::Column.parent(), Some(ResourceKind::Table));
        assert_eq!(ResourceKind::DerivedColumn.parent(), Some(ResourceKind::Table));
    }

    #[test]
    fn test_variant_base_kinds() {
        assert_eq!(ResourceKind::DerivedColumn.base(), ResourceKind::Column);
        assert_eq!(ResourceKind::View.base(), ResourceKind::View);
        assert_eq!(ResourceKind::Column.base(), ResourceKind::Column);
    }

    #[test]
    fn test_display_uses_display_name() {
        assert_eq!(ResourceKind::Schema.to_string(), "database schema");
    }
}
