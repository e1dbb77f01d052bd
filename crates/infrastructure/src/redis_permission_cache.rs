//! Redis-backed permission cache shared across service instances.

use async_trait::async_trait;
use redis::AsyncCommands;

use orgspace_application::PermissionCache;
use orgspace_core::{AppError, AppResult, OrgId, UserId};
use orgspace_domain::EffectivePermissionSet;

/// Redis implementation of the permission cache port.
///
/// Keys follow `{prefix}:{user_id}:{org_id}`; per-entry TTL is delegated to
/// Redis key expiry, so expired entries are plain misses.
#[derive(Clone)]
pub struct RedisPermissionCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisPermissionCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, user_id: UserId, org_id: OrgId) -> String {
        format!("{}:{user_id}:{org_id}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| {
                AppError::StorageUnavailable(format!("failed to connect to redis: {error}"))
            })
    }
}

#[async_trait]
impl PermissionCache for RedisPermissionCache {
    async fn get(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<Option<EffectivePermissionSet>> {
        let mut connection = self.connection().await?;

        let encoded: Option<String> = connection
            .get(self.key_for(user_id, org_id))
            .await
            .map_err(|error| {
                AppError::StorageUnavailable(format!(
                    "failed to read permission cache entry: {error}"
                ))
            })?;

        encoded
            .as_deref()
            .map(|value| {
                serde_json::from_str(value).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid permission cache entry for user '{user_id}': {error}"
                    ))
                })
            })
            .transpose()
    }

    async fn put(
        &self,
        user_id: UserId,
        org_id: OrgId,
        permissions: EffectivePermissionSet,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let value = serde_json::to_string(&permissions).map_err(|error| {
            AppError::Internal(format!("failed to encode permission set: {error}"))
        })?;

        let mut connection = self.connection().await?;
        connection
            .set_ex(
                self.key_for(user_id, org_id),
                value,
                u64::from(ttl_seconds),
            )
            .await
            .map_err(|error| {
                AppError::StorageUnavailable(format!(
                    "failed to write permission cache entry: {error}"
                ))
            })
    }

    async fn invalidate(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        let mut connection = self.connection().await?;
        let _: i64 = connection
            .del(self.key_for(user_id, org_id))
            .await
            .map_err(|error| {
                AppError::StorageUnavailable(format!(
                    "failed to drop permission cache entry: {error}"
                ))
            })?;

        Ok(())
    }

    async fn invalidate_all_for_user(&self, user_id: UserId) -> AppResult<()> {
        let mut connection = self.connection().await?;
        let pattern = format!("{}:{user_id}:*", self.key_prefix);
        let mut cursor: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut connection)
                .await
                .map_err(|error| {
                    AppError::StorageUnavailable(format!(
                        "failed to scan permission cache keys: {error}"
                    ))
                })?;

            if !keys.is_empty() {
                let _: i64 = connection.del(&keys).await.map_err(|error| {
                    AppError::StorageUnavailable(format!(
                        "failed to drop permission cache entries: {error}"
                    ))
                })?;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(())
    }
}
