//! Column decorations and integrator listing
//!
//! Primary keys, foreign key relationships and derived-column query targets
//! are attached to columns but have their own lifecycle: they can be added
//! or removed at any point before the column itself is removed.

use super::operations::{context, validate_editor};
use super::path::{build_path, ResourceOperation, Scope};
use super::registry::ResourceKind;
use crate::catalog::CatalogClient;
use crate::error::Result;
use crate::model::{
    DatabaseElement, DatabaseForeignKeyProperties, DatabasePrimaryKeyProperties,
    DatabaseQueryProperties, IntegratorIdentity, NULL_REQUEST_BODY,
};
use crate::validate;
use serde::Serialize;

impl CatalogClient {
    /// Databases attributed to an integrator
    pub async fn databases_for_integrator(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        start_from: i32,
        page_size: i32,
    ) -> Result<Vec<DatabaseElement>> {
        let op = ResourceOperation::ForIntegrator { integrator };
        let operation = op.name(ResourceKind::Database);

        validate::validate_user_id(user_id, &operation)?;
        validate::validate_guid(&integrator.guid, "integratorGUID", &operation)?;
        validate::validate_name(&integrator.name, "integratorName", &operation)?;
        let window = validate::validate_paging(start_from, page_size, self.max_page_size(), &operation)?;

        let scope = Scope::Retrieve { user_id };
        let path = build_path(self.server_name(), &scope, ResourceKind::Database, &op, Some(window));
        self.call_elements(context(&operation, user_id), &path).await
    }

    /// Mark a column as (part of) its table's primary key
    pub async fn set_primary_key_on_column(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        column_guid: &str,
        properties: &DatabasePrimaryKeyProperties,
    ) -> Result<()> {
        let op = ResourceOperation::SetPrimaryKey { column: column_guid };
        let operation = op.name(ResourceKind::Column);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(column_guid, "databaseColumnGUID", &operation)?;

        tracing::info!("{}: {} ({:?})", operation, column_guid, properties.key_pattern);
        self.decorate(user_id, integrator, &op, &operation, properties).await
    }

    pub async fn remove_primary_key_from_column(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        column_guid: &str,
    ) -> Result<()> {
        let op = ResourceOperation::RemovePrimaryKey { column: column_guid };
        let operation = op.name(ResourceKind::Column);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(column_guid, "databaseColumnGUID", &operation)?;

        tracing::info!("{}: {}", operation, column_guid);
        self.decorate(user_id, integrator, &op, &operation, &NULL_REQUEST_BODY)
            .await
    }

    /// Link a foreign key column to the primary key column it references.
    /// Both columns are resolved by the server in the same request.
    pub async fn add_foreign_key_relationship(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        primary_key_column_guid: &str,
        foreign_key_column_guid: &str,
        properties: &DatabaseForeignKeyProperties,
    ) -> Result<()> {
        let op = ResourceOperation::AddForeignKey {
            foreign_key_column: foreign_key_column_guid,
            primary_key_column: primary_key_column_guid,
        };
        let operation = op.name(ResourceKind::Column);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(primary_key_column_guid, "primaryKeyColumnGUID", &operation)?;
        validate::validate_guid(foreign_key_column_guid, "foreignKeyColumnGUID", &operation)?;
        let body = serde_json::to_value(properties).map_err(|e| {
            crate::error::CatalogError::invalid(&operation, "databaseForeignKeyProperties", e.to_string())
        })?;
        validate::validate_object(&body, "databaseForeignKeyProperties", &operation)?;
        validate::validate_name(&properties.name, "name", &operation)?;
        if let Some(confidence) = properties.confidence.filter(|c| *c > 100) {
            return Err(crate::error::CatalogError::invalid(
                &operation,
                "confidence",
                format!("{} is outside 0-100", confidence),
            ));
        }

        tracing::info!(
            "{}: {} -> {}",
            operation,
            foreign_key_column_guid,
            primary_key_column_guid
        );
        self.decorate(user_id, integrator, &op, &operation, &body).await
    }

    pub async fn remove_foreign_key_relationship(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        primary_key_column_guid: &str,
        foreign_key_column_guid: &str,
    ) -> Result<()> {
        let op = ResourceOperation::RemoveForeignKey {
            foreign_key_column: foreign_key_column_guid,
            primary_key_column: primary_key_column_guid,
        };
        let operation = op.name(ResourceKind::Column);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(primary_key_column_guid, "primaryKeyColumnGUID", &operation)?;
        validate::validate_guid(foreign_key_column_guid, "foreignKeyColumnGUID", &operation)?;

        tracing::info!(
            "{}: {} -> {}",
            operation,
            foreign_key_column_guid,
            primary_key_column_guid
        );
        self.decorate(user_id, integrator, &op, &operation, &NULL_REQUEST_BODY)
            .await
    }

    /// Append a query target to an existing derived column
    pub async fn add_query_target_to_derived_column(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        derived_column_guid: &str,
        query_target: &DatabaseQueryProperties,
    ) -> Result<()> {
        let op = ResourceOperation::AddQueryTarget {
            column: derived_column_guid,
        };
        let operation = op.name(ResourceKind::DerivedColumn);

        validate_editor(user_id, integrator, &operation)?;
        validate::validate_guid(derived_column_guid, "databaseColumnGUID", &operation)?;
        validate::validate_guid(&query_target.query_target_guid, "queryTargetGUID", &operation)?;

        tracing::info!(
            "{}: {} reads from {}",
            operation,
            derived_column_guid,
            query_target.query_target_guid
        );
        self.decorate(user_id, integrator, &op, &operation, query_target)
            .await
    }

    async fn decorate<B: Serialize + ?Sized>(
        &self,
        user_id: &str,
        integrator: &IntegratorIdentity,
        op: &ResourceOperation<'_>,
        operation: &str,
        body: &B,
    ) -> Result<()> {
        let scope = Scope::Edit { user_id, integrator };
        let path = build_path(self.server_name(), &scope, ResourceKind::Column, op, None);
        self.call_void(context(operation, user_id), &path, body).await
    }
}
