use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orgspace_application::RoleStore;
use orgspace_core::{AppError, AppResult, OrgId, RoleId, UserId};
use orgspace_domain::{OrganizationMembership, PermissionName, Role};

/// PostgreSQL-backed role and membership store.
#[derive(Clone)]
pub struct PostgresRoleStore {
    pool: PgPool,
}

impl PostgresRoleStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    org_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    is_default: bool,
}

impl From<MembershipRow> for OrganizationMembership {
    fn from(row: MembershipRow) -> Self {
        Self {
            org_id: OrgId::from_uuid(row.org_id),
            user_id: UserId::from_uuid(row.user_id),
            role_id: RoleId::from_uuid(row.role_id),
            is_default: row.is_default,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    org_id: Option<Uuid>,
    is_system: bool,
    is_default: bool,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

fn decode_permissions(rows: Vec<PermissionRow>) -> AppResult<BTreeSet<PermissionName>> {
    rows.into_iter()
        .map(|row| {
            PermissionName::new(&row.permission).map_err(|error| {
                AppError::Internal(format!(
                    "invalid stored permission '{}': {error}",
                    row.permission
                ))
            })
        })
        .collect()
}

#[async_trait]
impl RoleStore for PostgresRoleStore {
    async fn find_membership(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT org_id, user_id, role_id, is_default
            FROM organization_memberships
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to load membership: {error}"))
        })?;

        Ok(row.map(OrganizationMembership::from))
    }

    async fn find_default_membership(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT org_id, user_id, role_id, is_default
            FROM organization_memberships
            WHERE user_id = $1 AND is_default
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to load default membership: {error}"))
        })?;

        Ok(row.map(OrganizationMembership::from))
    }

    async fn get_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionName>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permission
            FROM role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to load role permissions: {error}"))
        })?;

        decode_permissions(rows)
    }

    async fn find_role_by_name(
        &self,
        name: &str,
        org_id: Option<OrgId>,
    ) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, org_id, is_system, is_default
            FROM roles
            WHERE name = $1 AND org_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(name)
        .bind(org_id.map(|org_id| org_id.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::StorageUnavailable(format!("failed to load role: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role_id = RoleId::from_uuid(row.id);
        let permissions = self.get_role_permissions(role_id).await?;

        Ok(Some(Role {
            id: role_id,
            name: row.name,
            org_id: row.org_id.map(OrgId::from_uuid),
            is_system: row.is_system,
            is_default: row.is_default,
            permissions,
        }))
    }

    async fn assign_role_to_member(
        &self,
        org_id: OrgId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE organization_memberships
            SET role_id = $3
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to assign role: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "no membership for user '{user_id}' in organization '{org_id}'"
            )));
        }

        Ok(())
    }
}
