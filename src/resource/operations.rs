//! Generic operation set
//!
//! One implementation of create / template-create / update / publish /
//! withdraw / remove / find / get-by-name / get-by-GUID / list-children,
//! shared by every level of the database hierarchy. A [`Resources`] handle
//! binds a resource kind to the property type written and read for it.
//!
//! Every operation runs the validation gate first, then builds its request
//! target, then issues exactly one call.

use super::path::{build_path, RequestPath, ResourceOperation, Scope};
use super::registry::ResourceKind;
use crate::catalog::http::RequestContext;
use crate::catalog::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::model::{
    CatalogElement, DatabaseColumnProperties, DatabaseProperties, DatabaseSchemaProperties,
    DatabaseTableProperties, ElementProperties, IntegratorIdentity, NULL_REQUEST_BODY,
};
use crate::validate::{self, PageWindow};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Operation handle for one resource kind
pub struct Resources<'a, P> {
    client: &'a CatalogClient,
    kind: ResourceKind,
    _properties: PhantomData<fn() -> P>,
}

impl<P> Clone for Resources<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Resources<'_, P> {}

impl CatalogClient {
    pub fn databases(&self) -> Resources<'_, DatabaseProperties> {
        Resources::new(self, ResourceKind::Database)
    }

    pub fn schemas(&self) -> Resources<'_, DatabaseSchemaProperties> {
        Resources::new(self, ResourceKind::Schema)
    }

    /// Tables; properties with a defining query are written as views
    pub fn tables(&self) -> Resources<'_, DatabaseTableProperties> {
        Resources::new(self, ResourceKind::Table)
    }

    pub fn views(&self) -> Resources<'_, DatabaseTableProperties> {
        Resources::new(self, ResourceKind::View)
    }

    /// Columns; properties with a formula or query targets are written as
    /// derived columns
    pub fn columns(&self) -> Resources<'_, DatabaseColumnProperties> {
        Resources::new(self, ResourceKind::Column)
    }

    pub fn derived_columns(&self) -> Resources<'_, DatabaseColumnProperties> {
        Resources::new(self, ResourceKind::DerivedColumn)
    }
}

/// Check the caller and integrator identity carried by every mutating call
pub(crate) fn validate_editor(user_id: &str, integrator: &IntegratorIdentity, operation: &str) -> Result<()> {
    validate::validate_user_id(user_id, operation)?;
    validate::validate_guid(&integrator.guid, "integratorGUID", operation)?;
    validate::validate_name(&integrator.name, "integratorName", operation)
}

impl<'a, P> Resources<'a, P>
where
    P: ElementProperties + DeserializeOwned,
{
    pub fn new(client: &'a CatalogClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            _properties: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Create an element and return the GUID the server assigned.
    ///
    /// `parent_guid` is required for every kind below Database and must be
    /// absent for Database itself.
    pub async fn create(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        parent_guid: Option<&str>,
        properties: &P,
    ) -> Result<String> {
        let kind = properties.variant_kind(self.kind);
        let op = ResourceOperation::Create { parent: parent_guid };
        let operation = op.name(kind);

        validate_editor(user_id, integrator, &operation)?;
        check_parent(kind, parent_guid, &operation)?;
        let body = properties_body(kind, properties, &operation)?;

        tracing::info!(
            "{}: creating {} '{}'",
            operation,
            kind,
            properties.qualified_name()
        );
        let path = self.edit_path(user_id, integrator, kind, &op);
        self.client
            .call_guid(context(&operation, user_id), &path, &body)
            .await
    }

    /// Create an element seeded from an existing element of the same kind.
    ///
    /// The new element always gets a fresh GUID; `properties` must carry a
    /// new qualified name.
    pub async fn create_from_template(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        template_guid: &str,
        parent_guid: Option<&str>,
        properties: &P,
    ) -> Result<String> {
        let kind = properties.variant_kind(self.kind);
        let op = ResourceOperation::CreateFromTemplate {
            parent: parent_guid,
            template: template_guid,
        };
        let operation = op.name(kind);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(template_guid, "templateGUID", &operation)?;
        check_parent(kind, parent_guid, &operation)?;
        let body = properties_body(kind, properties, &operation)?;

        tracing::info!(
            "{}: creating {} '{}' from template {}",
            operation,
            kind,
            properties.qualified_name(),
            template_guid
        );
        let path = self.edit_path(user_id, integrator, kind, &op);
        self.client
            .call_guid(context(&operation, user_id), &path, &body)
            .await
    }

    /// Replace the properties of an existing element
    pub async fn update(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        guid: &str,
        properties: &P,
    ) -> Result<()> {
        let kind = properties.variant_kind(self.kind);
        let op = ResourceOperation::Update { guid };
        let operation = op.name(kind);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(guid, &kind.base().def().guid_parameter, &operation)?;
        let body = properties_body(kind, properties, &operation)?;

        tracing::info!("{}: updating {} {}", operation, kind, guid);
        let path = self.edit_path(user_id, integrator, kind, &op);
        self.client
            .call_void(context(&operation, user_id), &path, &body)
            .await
    }

    /// Move an element into the published zone. Repeating it is harmless.
    pub async fn publish(&self, user_id: &str, integrator: &IntegratorIdentity, guid: &str) -> Result<()> {
        self.zone_change(user_id, integrator, ResourceOperation::Publish { guid }, guid)
            .await
    }

    /// Move an element back out of the published zone
    pub async fn withdraw(&self, user_id: &str, integrator: &IntegratorIdentity, guid: &str) -> Result<()> {
        self.zone_change(user_id, integrator, ResourceOperation::Withdraw { guid }, guid)
            .await
    }

    async fn zone_change(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        op: ResourceOperation<'_>,
        guid: &str,
    ) -> Result<()> {
        let operation = op.name(self.kind);
        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(guid, &op.target_kind(self.kind).def().guid_parameter, &operation)?;

        tracing::info!("{}: {}", operation, guid);
        let path = self.edit_path(user_id, integrator, self.kind, &op);
        self.client
            .call_void(context(&operation, user_id), &path, &NULL_REQUEST_BODY)
            .await
    }

    /// Remove an element. The qualified name must match the element's
    /// current one; the server checks it.
    pub async fn remove(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        guid: &str,
        qualified_name: &str,
    ) -> Result<()> {
        let op = ResourceOperation::Remove { guid, qualified_name };
        let operation = op.name(self.kind);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(guid, &op.target_kind(self.kind).def().guid_parameter, &operation)?;
        validate::validate_name(qualified_name, "qualifiedName", &operation)?;

        tracing::info!("{}: removing {} ({})", operation, guid, qualified_name);
        let path = self.edit_path(user_id, integrator, self.kind, &op);
        self.client
            .call_void(context(&operation, user_id), &path, &NULL_REQUEST_BODY)
            .await
    }

    /// Regular-expression search over element properties
    pub async fn find(
        &self,
        user_id: &str,
        search_string: &str,
        start_from: i32,
        page_size: i32,
    ) -> Result<Vec<CatalogElement<P>>> {
        let op = ResourceOperation::Find { search_string };
        let operation = op.name(self.kind);

        validate::validate_user_id(user_id, &operation)?;
        validate::validate_search_string(search_string, "searchString", &operation)?;
        let window = self.window(start_from, page_size, &operation)?;

        let path = self.read_path(user_id, &op, Some(window));
        self.client
            .call_elements(context(&operation, user_id), &path)
            .await
    }

    /// Exact match on qualified name or display name; no wildcards
    pub async fn get_by_name(
        &self,
        user_id: &str,
        name: &str,
        start_from: i32,
        page_size: i32,
    ) -> Result<Vec<CatalogElement<P>>> {
        let op = ResourceOperation::GetByName { name };
        let operation = op.name(self.kind);

        validate::validate_user_id(user_id, &operation)?;
        validate::validate_name(name, "name", &operation)?;
        let window = self.window(start_from, page_size, &operation)?;

        let path = self.read_path(user_id, &op, Some(window));
        self.client
            .call_elements(context(&operation, user_id), &path)
            .await
    }

    /// Read one element; an unknown GUID is `CatalogError::NotFound`
    pub async fn get_by_guid(&self, user_id: &str, guid: &str) -> Result<CatalogElement<P>> {
        let op = ResourceOperation::GetByGuid { guid };
        let operation = op.name(self.kind);
        let target = op.target_kind(self.kind);

        validate::validate_user_id(user_id, &operation)?;
        validate::validate_guid(guid, &target.def().guid_parameter, &operation)?;

        let path = self.read_path(user_id, &op, None);
        self.client
            .call_element(context(&operation, user_id), &path, target, guid)
            .await
    }

    /// List the children of `parent_guid`, one page at a time
    pub async fn list_for_parent(
        &self,
        user_id: &str,
        parent_guid: &str,
        start_from: i32,
        page_size: i32,
    ) -> Result<Vec<CatalogElement<P>>> {
        let op = ResourceOperation::ListForParent { parent: parent_guid };
        let operation = op.name(self.kind);

        validate::validate_user_id(user_id, &operation)?;
        let parent = self.kind.parent().ok_or_else(|| {
            CatalogError::invalid(
                &operation,
                "parentGUID",
                format!("a {} has no parent to list under", self.kind),
            )
        })?;
        validate::validate_guid(parent_guid, &parent.def().guid_parameter, &operation)?;
        let window = self.window(start_from, page_size, &operation)?;

        let path = self.read_path(user_id, &op, Some(window));
        self.client
            .call_elements(context(&operation, user_id), &path)
            .await
    }

    fn window(&self, start_from: i32, page_size: i32, operation: &str) -> Result<PageWindow> {
        validate::validate_paging(start_from, page_size, self.client.max_page_size(), operation)
    }

    fn edit_path(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        kind: ResourceKind,
        op: &ResourceOperation<'_>,
    ) -> RequestPath {
        let scope = Scope::Edit { user_id, integrator };
        build_path(self.client.server_name(), &scope, kind, op, None)
    }

    fn read_path(&self, user_id: &str, op: &ResourceOperation<'_>, window: Option<PageWindow>) -> RequestPath {
        let scope = Scope::Retrieve { user_id };
        build_path(self.client.server_name(), &scope, self.kind, op, window)
    }
}

pub(crate) fn context<'a>(operation: &'a str, user_id: &'a str) -> RequestContext<'a> {
    RequestContext { operation, user_id }
}

fn check_parent(kind: ResourceKind, parent_guid: Option<&str>, operation: &str) -> Result<()> {
    match (kind.parent(), parent_guid) {
        (Some(parent), Some(guid)) => validate::validate_guid(guid, &parent.def().guid_parameter, operation),
        (Some(parent), None) => Err(CatalogError::invalid(
            operation,
            &parent.def().guid_parameter,
            format!("a {} must be created under a {}", kind, parent),
        )),
        (None, Some(_)) => Err(CatalogError::invalid(
            operation,
            "parentGUID",
            format!("a {} has no parent", kind),
        )),
        (None, None) => Ok(()),
    }
}

/// Serialize and check a properties object, including its qualified name
fn properties_body<P: ElementProperties>(kind: ResourceKind, properties: &P, operation: &str) -> Result<Value> {
    let parameter = &kind.def().properties_parameter;
    let body = serde_json::to_value(properties)
        .map_err(|e| CatalogError::invalid(operation, parameter, format!("cannot be serialized: {}", e)))?;
    validate::validate_object(&body, parameter, operation)?;
    validate::validate_name(properties.qualified_name(), "qualifiedName", operation)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClientConfig;
    use crate::error::ParameterSource;

    const GUID: &str = "6c1c8b27-5f0a-4d43-b0f4-7b4f3e6f51a2";

    // Port 9 is discard; any request that slipped through would fail as a
    // transport error rather than InvalidParameter.
    fn client() -> CatalogClient {
        let config = ClientConfig::builder("http://127.0.0.1:9", "cocoMDS1")
            .max_page_size(100)
            .build()
            .unwrap();
        CatalogClient::new(config).unwrap()
    }

    fn integrator() -> IntegratorIdentity {
        IntegratorIdentity::new(GUID, "pg-daemon")
    }

    fn assert_local(result: Result<impl std::fmt::Debug>, parameter_name: &str) {
        match result.unwrap_err() {
            CatalogError::InvalidParameter {
                parameter,
                source_side: ParameterSource::Client,
                ..
            } => assert_eq!(parameter, parameter_name),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn sales_db() -> DatabaseProperties {
        DatabaseProperties {
            qualified_name: "SalesDB".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_validation_order() {
        let client = client();
        let dbs = client.databases();

        assert_local(tokio_test::block_on(dbs.create("", &integrator(), None, &sales_db())), "userId");

        let bad = IntegratorIdentity::new("nope", "pg-daemon");
        assert_local(
            tokio_test::block_on(dbs.create("erin", &bad, None, &sales_db())),
            "integratorGUID",
        );

        let unnamed = IntegratorIdentity::new(GUID, " ");
        assert_local(
            tokio_test::block_on(dbs.create("erin", &unnamed, None, &sales_db())),
            "integratorName",
        );

        let blank = DatabaseProperties::default();
        assert_local(
            tokio_test::block_on(dbs.create("erin", &integrator(), None, &blank)),
            "qualifiedName",
        );
    }

    #[test]
    fn test_blank_qualified_name_is_rejected() {
        let client = client();
        let props = DatabaseSchemaProperties {
            qualified_name: "  ".to_string(),
            display_name: Some("public".to_string()),
            ..Default::default()
        };
        assert_local(
            tokio_test::block_on(client.schemas().create("erin", &integrator(), Some(GUID), &props)),
            "qualifiedName",
        );
    }

    #[test]
    fn test_parent_rules() {
        let client = client();
        let props = DatabaseSchemaProperties {
            qualified_name: "SalesDB.public".to_string(),
            ..Default::default()
        };
        assert_local(
            tokio_test::block_on(client.schemas().create("erin", &integrator(), None, &props)),
            "databaseGUID",
        );
        assert_local(
            tokio_test::block_on(client.databases().create("erin", &integrator(), Some(GUID), &sales_db())),
            "parentGUID",
        );
    }

    #[test]
    fn test_template_guid_checked_before_parent() {
        let client = client();
        let props = DatabaseTableProperties {
            qualified_name: "SalesDB.public.orders_copy".to_string(),
            ..Default::default()
        };
        assert_local(
            tokio_test::block_on(client.tables().create_from_template(
                "erin",
                &integrator(),
                "",
                Some("also-bad"),
                &props,
            )),
            "templateGUID",
        );
    }

    #[test]
    fn test_read_validation() {
        let client = client();
        assert_local(tokio_test::block_on(client.databases().find("erin", "", 0, 10)), "searchString");
        assert_local(tokio_test::block_on(client.databases().find("erin", ".*", -1, 10)), "startFrom");
        assert_local(tokio_test::block_on(client.columns().get_by_name("erin", "", 0, 10)), "name");
        assert_local(
            tokio_test::block_on(client.columns().get_by_guid("erin", "x")),
            "databaseColumnGUID",
        );
        assert_local(
            tokio_test::block_on(client.tables().list_for_parent("erin", "x", 0, 10)),
            "databaseSchemaGUID",
        );
        assert_local(
            tokio_test::block_on(client.databases().list_for_parent("erin", GUID, 0, 10)),
            "parentGUID",
        );
    }

    #[test]
    fn test_remove_requires_qualified_name() {
        let client = client();
        assert_local(
            tokio_test::block_on(client.databases().remove("erin", &integrator(), GUID, "")),
            "qualifiedName",
        );
    }

    #[test]
    fn test_unreachable_server_is_property_server_error() {
        let client = client();
        let err = tokio_test::block_on(client.databases().get_by_guid("erin", GUID)).unwrap_err();
        assert!(matches!(err, CatalogError::PropertyServer { .. }));
        assert_eq!(err.operation(), "getDatabaseByGUID");
    }
}
