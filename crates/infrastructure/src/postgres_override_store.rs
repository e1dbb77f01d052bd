use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orgspace_application::OverrideStore;
use orgspace_core::{AppError, AppResult, OrgId, UserId};
use orgspace_domain::{PermissionName, PermissionOverride};

/// PostgreSQL-backed permission override store.
#[derive(Clone)]
pub struct PostgresOverrideStore {
    pool: PgPool,
}

impl PostgresOverrideStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OverrideRow {
    org_id: Uuid,
    user_id: Uuid,
    permission: String,
    granted: bool,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<OverrideRow> for PermissionOverride {
    type Error = AppError;

    fn try_from(row: OverrideRow) -> AppResult<Self> {
        let permission = PermissionName::new(&row.permission).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored permission '{}': {error}",
                row.permission
            ))
        })?;

        Ok(Self {
            org_id: OrgId::from_uuid(row.org_id),
            user_id: UserId::from_uuid(row.user_id),
            permission,
            granted: row.granted,
            expires_at: row.expires_at,
        })
    }
}

#[async_trait]
impl OverrideStore for PostgresOverrideStore {
    async fn list_active_overrides(
        &self,
        org_id: OrgId,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionOverride>> {
        let rows = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT org_id, user_id, permission, granted, expires_at
            FROM permission_overrides
            WHERE org_id = $1
                AND user_id = $2
                AND (expires_at IS NULL OR expires_at > $3)
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(as_of)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to load overrides: {error}"))
        })?;

        rows.into_iter().map(PermissionOverride::try_from).collect()
    }

    async fn upsert_override(&self, entry: PermissionOverride) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permission_overrides (org_id, user_id, permission, granted, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (org_id, user_id, permission)
            DO UPDATE SET granted = EXCLUDED.granted, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(entry.org_id.as_uuid())
        .bind(entry.user_id.as_uuid())
        .bind(entry.permission.as_str())
        .bind(entry.granted)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to upsert override: {error}"))
        })?;

        Ok(())
    }
}
