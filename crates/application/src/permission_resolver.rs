use std::sync::Arc;

use orgspace_core::{AppResult, OrgId, UserId};
use orgspace_domain::EffectivePermissionSet;

use crate::authorization_ports::{Clock, OverrideStore, RoleStore};

/// Computes the effective permission set for a (user, organization) pair.
///
/// The result is a pure function of the membership's role grants combined
/// with the overrides active at resolution time, evaluated at one logical
/// instant. Caching sits above this service, never inside it.
#[derive(Clone)]
pub struct PermissionResolver {
    role_store: Arc<dyn RoleStore>,
    override_store: Arc<dyn OverrideStore>,
    clock: Arc<dyn Clock>,
}

impl PermissionResolver {
    /// Creates a resolver from store implementations and a time source.
    #[must_use]
    pub fn new(
        role_store: Arc<dyn RoleStore>,
        override_store: Arc<dyn OverrideStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            role_store,
            override_store,
            clock,
        }
    }

    /// Resolves the effective permission set for one user in one organization.
    ///
    /// A missing membership resolves to the empty set; "not a member" is a
    /// valid answer, not an error. Store failures surface as
    /// [`orgspace_core::AppError::StorageUnavailable`] and must never be
    /// interpreted as "no permissions".
    pub async fn resolve(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<EffectivePermissionSet> {
        let Some(membership) = self.role_store.find_membership(org_id, user_id).await? else {
            return Ok(EffectivePermissionSet::new());
        };

        let role_permissions = self
            .role_store
            .get_role_permissions(membership.role_id)
            .await?;

        let overrides = self
            .override_store
            .list_active_overrides(org_id, user_id, self.clock.now())
            .await?;

        let mut effective: EffectivePermissionSet = role_permissions.into_iter().collect();
        for entry in overrides {
            if entry.granted {
                effective.insert(entry.permission);
            } else {
                effective.remove(&entry.permission);
            }
        }

        Ok(effective)
    }
}
