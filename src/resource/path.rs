//! Resource address builder
//!
//! Turns a (resource kind, operation, identifiers) tuple into a request
//! target. Every address is assembled from path segments by [`compose`];
//! nothing here concatenates URL strings by hand, so separators cannot go
//! missing and every caller-supplied value is percent-encoded exactly once.

use super::registry::ResourceKind;
use crate::model::IntegratorIdentity;
use crate::validate::PageWindow;
use std::fmt;
use url::Url;

/// Fixed prefix between the server name and the caller identity
const SERVICE_PATH: &[&str] = &["open-metadata", "access-services", "data-platform"];

/// Who is calling: reads carry only the user, edits also carry the integrator
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Retrieve {
        user_id: &'a str,
    },
    Edit {
        user_id: &'a str,
        integrator: &'a IntegratorIdentity,
    },
}

impl<'a> Scope<'a> {
    pub fn user_id(&self) -> &'a str {
        match self {
            Scope::Retrieve { user_id } | Scope::Edit { user_id, .. } => user_id,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Scope::Edit { .. })
    }
}

/// The operation shapes a request can take
#[derive(Debug, Clone, Copy)]
pub enum ResourceOperation<'a> {
    Create {
        parent: Option<&'a str>,
    },
    CreateFromTemplate {
        parent: Option<&'a str>,
        template: &'a str,
    },
    Update {
        guid: &'a str,
    },
    Publish {
        guid: &'a str,
    },
    Withdraw {
        guid: &'a str,
    },
    Remove {
        guid: &'a str,
        qualified_name: &'a str,
    },
    Find {
        search_string: &'a str,
    },
    GetByName {
        name: &'a str,
    },
    GetByGuid {
        guid: &'a str,
    },
    ListForParent {
        parent: &'a str,
    },
    ForIntegrator {
        integrator: &'a IntegratorIdentity,
    },
    SetPrimaryKey {
        column: &'a str,
    },
    RemovePrimaryKey {
        column: &'a str,
    },
    AddForeignKey {
        foreign_key_column: &'a str,
        primary_key_column: &'a str,
    },
    RemoveForeignKey {
        foreign_key_column: &'a str,
        primary_key_column: &'a str,
    },
    AddQueryTarget {
        column: &'a str,
    },
}

impl ResourceOperation<'_> {
    /// Operations that change catalog state and so need an integrator identity
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            ResourceOperation::Find { .. }
                | ResourceOperation::GetByName { .. }
                | ResourceOperation::GetByGuid { .. }
                | ResourceOperation::ListForParent { .. }
                | ResourceOperation::ForIntegrator { .. }
        )
    }

    /// List reads, which carry a paging window
    pub fn is_paged(&self) -> bool {
        matches!(
            self,
            ResourceOperation::Find { .. }
                | ResourceOperation::GetByName { .. }
                | ResourceOperation::ListForParent { .. }
                | ResourceOperation::ForIntegrator { .. }
        )
    }

    /// The kind whose path this operation is addressed under.
    ///
    /// Create and update address the requested kind itself so that variant
    /// properties reach the right endpoint; decorations always address
    /// columns; everything else goes to the base kind.
    pub fn target_kind(&self, kind: ResourceKind) -> ResourceKind {
        match self {
            ResourceOperation::Create { .. }
            | ResourceOperation::CreateFromTemplate { .. }
            | ResourceOperation::Update { .. } => kind,
            ResourceOperation::SetPrimaryKey { .. }
            | ResourceOperation::RemovePrimaryKey { .. }
            | ResourceOperation::AddForeignKey { .. }
            | ResourceOperation::RemoveForeignKey { .. }
            | ResourceOperation::AddQueryTarget { .. } => ResourceKind::Column,
            _ => kind.base(),
        }
    }

    /// Operation name reported in errors and logs, e.g. `createDatabaseSchema`
    pub fn name(&self, kind: ResourceKind) -> String {
        let target = self.target_kind(kind);
        let def = target.def();
        let type_name = &def.type_name;
        match self {
            ResourceOperation::Create { .. } => format!("create{}", type_name),
            ResourceOperation::CreateFromTemplate { .. } => format!("create{}FromTemplate", type_name),
            ResourceOperation::Update { .. } => format!("update{}", type_name),
            ResourceOperation::Publish { .. } => format!("publish{}", type_name),
            ResourceOperation::Withdraw { .. } => format!("withdraw{}", type_name),
            ResourceOperation::Remove { .. } => format!("remove{}", type_name),
            ResourceOperation::Find { .. } => def.find_operation.clone(),
            ResourceOperation::GetByName { .. } => def.by_name_operation.clone(),
            ResourceOperation::GetByGuid { .. } => format!("get{}ByGUID", type_name),
            ResourceOperation::ListForParent { .. } => def
                .list_operation
                .clone()
                .unwrap_or_else(|| format!("get{}sForParent", type_name)),
            ResourceOperation::ForIntegrator { .. } => "getDatabasesByDaemon".to_string(),
            ResourceOperation::SetPrimaryKey { .. } => "setPrimaryKeyOnColumn".to_string(),
            ResourceOperation::RemovePrimaryKey { .. } => "removePrimaryKeyFromColumn".to_string(),
            ResourceOperation::AddForeignKey { .. } => "addForeignKeyRelationship".to_string(),
            ResourceOperation::RemoveForeignKey { .. } => "removeForeignKeyRelationship".to_string(),
            ResourceOperation::AddQueryTarget { .. } => "addQueryTargetToDerivedColumn".to_string(),
        }
    }
}

/// A request target: decoded path segments plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
}

impl RequestPath {
    /// Path prefix shared by every request: server, service and caller identity
    fn scoped(server: &str, scope: &Scope<'_>) -> Self {
        let mut path = RequestPath {
            segments: Vec::new(),
            query: Vec::new(),
        };
        path.push("servers");
        path.push(server);
        for segment in SERVICE_PATH {
            path.push(*segment);
        }
        path.push("users");
        path.push(scope.user_id());
        if let Scope::Edit { integrator, .. } = scope {
            path.push("integrators");
            path.push(&integrator.guid);
            path.push(&integrator.name);
        }
        path
    }

    fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Push a fixed multi-segment path such as `databases/schemas`
    fn push_fixed(&mut self, path: &str) {
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            self.push(segment);
        }
    }

    fn with_window(mut self, window: Option<PageWindow>) -> Self {
        if let Some(window) = window {
            self.query.extend(window.query_pairs());
        }
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Resolve against the platform root URL
    ///
    /// A `.` or `..` segment is refused, since URL parsing would resolve it
    /// and address a different resource.
    pub fn to_url(&self, platform_root: &Url) -> Result<Url, AddressError> {
        if let Some(segment) = self.segments.iter().find(|s| *s == "." || *s == "..") {
            return Err(AddressError::DotSegment(segment.clone()));
        }
        let root = platform_root.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", root, self))?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("'{0}' cannot be used as a path segment")]
    DotSegment(String),

    #[error(transparent)]
    Parse(#[from] url::ParseError),
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", urlencoding::encode(segment))?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", separator, key, urlencoding::encode(value))?;
        }
        Ok(())
    }
}

/// Compose a request target from its structural parts
///
/// The order is fixed: caller scope, the resource path, the identifying
/// GUIDs (outermost first), then the operation suffix and paging window.
/// Only `resource_path` is split on `/`; each GUID and suffix entry is a
/// single segment.
pub fn compose(
    server: &str,
    scope: &Scope<'_>,
    resource_path: &str,
    guids: &[&str],
    suffix: &[&str],
    window: Option<PageWindow>,
) -> RequestPath {
    let mut path = RequestPath::scoped(server, scope);
    path.push_fixed(resource_path);
    for guid in guids {
        path.push(*guid);
    }
    for segment in suffix {
        path.push(*segment);
    }
    path.with_window(window)
}

/// Build the request target for `operation` on `kind`
///
/// `window` is only used by list reads and ignored otherwise.
pub fn build_path(
    server: &str,
    scope: &Scope<'_>,
    kind: ResourceKind,
    operation: &ResourceOperation<'_>,
    window: Option<PageWindow>,
) -> RequestPath {
    debug_assert_eq!(
        scope.is_edit(),
        operation.is_mutating(),
        "caller scope does not match operation {:?}",
        operation
    );
    let window = window.filter(|_| operation.is_paged());

    let target = operation.target_kind(kind);
    let def = target.def();
    let path = def.path.as_str();

    match *operation {
        ResourceOperation::Create { parent } => compose_child(server, scope, target, parent, &[], None),
        ResourceOperation::CreateFromTemplate { parent, template } => compose_child(
            server,
            scope,
            target,
            parent,
            &["from-template", template],
            None,
        ),
        ResourceOperation::Update { guid } => compose(server, scope, path, &[guid], &[], None),
        ResourceOperation::Publish { guid } => compose(server, scope, path, &[guid], &["publish"], None),
        ResourceOperation::Withdraw { guid } => compose(server, scope, path, &[guid], &["withdraw"], None),
        ResourceOperation::Remove {
            guid,
            qualified_name,
        } => compose(server, scope, path, &[guid, qualified_name], &["delete"], None),
        ResourceOperation::Find { search_string } => compose(
            server,
            scope,
            path,
            &[],
            &["by-search-string", search_string],
            window,
        ),
        ResourceOperation::GetByName { name } => {
            compose(server, scope, path, &[], &["by-name", name], window)
        }
        ResourceOperation::GetByGuid { guid } => compose(server, scope, path, &[guid], &[], None),
        ResourceOperation::ListForParent { parent } => {
            compose_child(server, scope, target, Some(parent), &[], window)
        }
        ResourceOperation::ForIntegrator { integrator } => compose(
            server,
            scope,
            path,
            &[],
            &["for-integrator", integrator.guid.as_str(), integrator.name.as_str()],
            window,
        ),
        ResourceOperation::SetPrimaryKey { column } => {
            compose(server, scope, path, &[column], &["primary-key"], None)
        }
        ResourceOperation::RemovePrimaryKey { column } => {
            compose(server, scope, path, &[column], &["primary-key", "delete"], None)
        }
        ResourceOperation::AddForeignKey {
            foreign_key_column,
            primary_key_column,
        } => compose(
            server,
            scope,
            path,
            &[foreign_key_column],
            &["foreign-key", primary_key_column],
            None,
        ),
        ResourceOperation::RemoveForeignKey {
            foreign_key_column,
            primary_key_column,
        } => compose(
            server,
            scope,
            path,
            &[foreign_key_column],
            &["foreign-key", primary_key_column, "delete"],
            None,
        ),
        ResourceOperation::AddQueryTarget { column } => {
            compose(server, scope, path, &[column], &["query-target"], None)
        }
    }
}

/// Address a kind below its parent: `<parent path>/<parent guid>/<child path>`.
/// Top-level kinds are addressed by their own path.
fn compose_child(
    server: &str,
    scope: &Scope<'_>,
    kind: ResourceKind,
    parent: Option<&str>,
    suffix: &[&str],
    window: Option<PageWindow>,
) -> RequestPath {
    let def = kind.def();
    match (kind.parent(), parent, def.child_path.as_deref()) {
        (Some(parent_kind), Some(parent_guid), Some(child_path)) => {
            let mut full_suffix: Vec<&str> = child_path.split('/').collect();
            full_suffix.extend_from_slice(suffix);
            compose(
                server,
                scope,
                &parent_kind.def().path,
                &[parent_guid],
                &full_suffix,
                window,
            )
        }
        _ => compose(server, scope, &def.path, &[], suffix, window),
    }
}
