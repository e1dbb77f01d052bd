use async_trait::async_trait;
use sqlx::PgPool;

use orgspace_application::{AuditEvent, AuditSink};
use orgspace_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit sink.
#[derive(Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Creates a sink with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_events (
                org_id,
                actor_user_id,
                action,
                resource_type,
                resource_id,
                detail
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.org_id.as_uuid())
        .bind(event.actor_user_id.as_uuid())
        .bind(event.action.as_str())
        .bind(event.resource_type)
        .bind(event.resource_id)
        .bind(event.detail)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::StorageUnavailable(format!("failed to append audit event: {error}"))
        })?;

        Ok(())
    }
}
