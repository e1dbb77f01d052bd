use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgspace_core::{AppResult, OrgId, RoleId, UserId};
use orgspace_domain::{OrganizationMembership, PermissionName, PermissionOverride, Role};

/// Port for durable role and membership storage.
///
/// The store provides its own internal consistency; reads made here are not
/// coordinated with [`OverrideStore`] reads, and the resolver tolerates
/// observing one store updated before the other.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Finds the membership row for one user in one organization.
    async fn find_membership(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>>;

    /// Finds the membership flagged as the user's default organization.
    async fn find_default_membership(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>>;

    /// Returns the permission names granted by a role.
    async fn get_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionName>>;

    /// Finds a role by name, org-scoped when `org_id` is given, otherwise in
    /// the system scope.
    async fn find_role_by_name(&self, name: &str, org_id: Option<OrgId>)
    -> AppResult<Option<Role>>;

    /// Reassigns the member's role within the organization.
    async fn assign_role_to_member(
        &self,
        org_id: OrgId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()>;
}

/// Port for durable per-user permission override storage.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Lists overrides active at `as_of` for one user in one organization.
    ///
    /// An override whose `expires_at` is at or before `as_of` must not be
    /// returned, regardless of its `granted` flag.
    async fn list_active_overrides(
        &self,
        org_id: OrgId,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionOverride>>;

    /// Creates or replaces the override for its `(org, user, permission)` key.
    async fn upsert_override(&self, entry: PermissionOverride) -> AppResult<()>;
}
