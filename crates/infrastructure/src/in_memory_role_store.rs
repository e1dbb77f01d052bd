use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use orgspace_application::RoleStore;
use orgspace_core::{AppError, AppResult, OrgId, RoleId, UserId};
use orgspace_domain::{OrganizationMembership, PermissionName, Role, SystemRole};

/// In-memory role and membership store for tests and development wiring.
#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<RoleId, Role>>,
    memberships: RwLock<HashMap<(OrgId, UserId), OrganizationMembership>>,
}

impl InMemoryRoleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the built-in system roles.
    pub async fn with_system_roles() -> AppResult<Self> {
        let store = Self::new();
        for system_role in SystemRole::all() {
            store.upsert_role(system_role.template()?).await;
        }

        Ok(store)
    }

    /// Inserts or replaces a role.
    pub async fn upsert_role(&self, role: Role) {
        self.roles.write().await.insert(role.id, role);
    }

    /// Inserts or replaces a membership.
    pub async fn upsert_membership(&self, membership: OrganizationMembership) {
        self.memberships
            .write()
            .await
            .insert((membership.org_id, membership.user_id), membership);
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn find_membership(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(org_id, user_id))
            .copied())
    }

    async fn find_default_membership(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .find(|membership| membership.user_id == user_id && membership.is_default)
            .copied())
    }

    async fn get_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionName>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&role_id)
            .map(|role| role.permissions.clone())
            .unwrap_or_default())
    }

    async fn find_role_by_name(
        &self,
        name: &str,
        org_id: Option<OrgId>,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.name == name && role.org_id == org_id)
            .cloned())
    }

    async fn assign_role_to_member(
        &self,
        org_id: OrgId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut memberships = self.memberships.write().await;
        match memberships.get_mut(&(org_id, user_id)) {
            Some(membership) => {
                membership.role_id = role_id;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "no membership for user '{user_id}' in organization '{org_id}'"
            ))),
        }
    }
}
