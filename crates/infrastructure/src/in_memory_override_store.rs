use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use orgspace_application::OverrideStore;
use orgspace_core::{AppResult, OrgId, UserId};
use orgspace_domain::PermissionOverride;

/// In-memory override store for tests and development wiring.
#[derive(Default)]
pub struct InMemoryOverrideStore {
    overrides: RwLock<Vec<PermissionOverride>>,
}

impl InMemoryOverrideStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn list_active_overrides(
        &self,
        org_id: OrgId,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionOverride>> {
        Ok(self
            .overrides
            .read()
            .await
            .iter()
            .filter(|entry| {
                entry.org_id == org_id && entry.user_id == user_id && entry.is_active(as_of)
            })
            .cloned()
            .collect())
    }

    async fn upsert_override(&self, entry: PermissionOverride) -> AppResult<()> {
        let mut overrides = self.overrides.write().await;
        overrides.retain(|existing| {
            !(existing.org_id == entry.org_id
                && existing.user_id == entry.user_id
                && existing.permission == entry.permission)
        });
        overrides.push(entry);
        Ok(())
    }
}
