use async_trait::async_trait;
use orgspace_core::{AppResult, OrgId, UserId};
use orgspace_domain::EffectivePermissionSet;

/// Cache port for resolved permission sets, keyed by (user, organization).
///
/// Entries expire a fixed TTL after insertion; an expired entry behaves as a
/// miss and is never served. Lazy eviction is acceptable. The cache is an
/// optimization, never a source of truth: any write that can change a set
/// must invalidate the affected keys before it is acknowledged.
#[async_trait]
pub trait PermissionCache: Send + Sync {
    /// Returns the cached set for one key, or `None` on miss or expiry.
    async fn get(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<Option<EffectivePermissionSet>>;

    /// Stores a resolved set with a TTL in seconds. A zero TTL disables
    /// caching for the entry.
    async fn put(
        &self,
        user_id: UserId,
        org_id: OrgId,
        permissions: EffectivePermissionSet,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Drops the entry for one key.
    async fn invalidate(&self, user_id: UserId, org_id: OrgId) -> AppResult<()>;

    /// Drops every entry for one user across all organizations.
    async fn invalidate_all_for_user(&self, user_id: UserId) -> AppResult<()>;
}
