use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use orgspace_application::{Clock, PermissionCache};
use orgspace_core::{AppResult, OrgId, UserId};
use orgspace_domain::EffectivePermissionSet;

#[derive(Debug, Clone)]
struct CacheEntry {
    permissions: EffectivePermissionSet,
    expires_at: DateTime<Utc>,
}

/// In-memory permission cache with per-entry TTL and lazy eviction.
///
/// Expiry is measured against the injected clock so the adapter and the
/// resolver above it share one notion of "now".
pub struct InMemoryPermissionCache {
    entries: RwLock<HashMap<(UserId, OrgId), CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPermissionCache {
    /// Creates an empty cache reading time from the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl PermissionCache for InMemoryPermissionCache {
    async fn get(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<Option<EffectivePermissionSet>> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(&(user_id, org_id)) {
                Some(entry) if entry.expires_at > now => {
                    return Ok(Some(entry.permissions.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&(user_id, org_id))
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.remove(&(user_id, org_id));
        }

        Ok(None)
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

        let expires_at = self.clock.now() + Duration::seconds(i64::from(ttl_seconds));
        self.entries.write().await.insert(
            (user_id, org_id),
            CacheEntry {
                permissions,
                expires_at,
            },
        );

        Ok(())
    }

    async fn invalidate(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        self.entries.write().await.remove(&(user_id, org_id));
        Ok(())
    }

    async fn invalidate_all_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.entries
            .write()
            .await
            .retain(|(cached_user_id, _), _| cached_user_id != &user_id);
        Ok(())
    }
}
