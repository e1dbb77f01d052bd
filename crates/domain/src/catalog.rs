use std::collections::BTreeMap;

use orgspace_core::{AppError, AppResult};

use crate::permission::{Permission, PermissionName};

/// Static registry of known permissions.
///
/// Loaded once at process start and read-only thereafter. Unknown names are
/// simply absent; lookups never fail so the catalog stays forward-compatible
/// with permissions added by newer deployments.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    by_name: BTreeMap<PermissionName, Permission>,
}

impl PermissionCatalog {
    /// Creates a catalog from permission entries. Duplicate names are rejected.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> AppResult<Self> {
        let mut by_name = BTreeMap::new();
        for permission in permissions {
            let name = permission.name.clone();
            if by_name.insert(name.clone(), permission).is_some() {
                return Err(AppError::Conflict(format!(
                    "duplicate permission '{name}' in catalog"
                )));
            }
        }

        Ok(Self { by_name })
    }

    /// Creates the builtin platform catalog.
    pub fn builtin() -> AppResult<Self> {
        const BUILTIN: &[(&str, &str)] = &[
            ("org.read", "View organization details"),
            ("org.update", "Update organization settings"),
            ("org.delete", "Delete organization"),
            ("org.transfer", "Transfer organization ownership"),
            ("members.read", "View organization members"),
            ("members.invite", "Invite new members"),
            ("members.update", "Update member roles"),
            ("members.remove", "Remove members from organization"),
            ("invitations.create", "Create invitations"),
            ("invitations.read", "View invitations"),
            ("invitations.revoke", "Revoke invitations"),
            ("billing.read", "View billing information"),
            ("billing.update", "Update payment methods"),
            ("billing.manage", "Manage subscription plans"),
            ("api_keys.create", "Create API keys"),
            ("api_keys.read", "View API keys"),
            ("api_keys.revoke", "Revoke API keys"),
            ("audit.read", "View audit logs"),
            ("security.manage", "Manage security settings"),
        ];

        let mut permissions = Vec::with_capacity(BUILTIN.len());
        for (name, description) in BUILTIN {
            permissions.push(Permission::new(PermissionName::new(*name)?, *description)?);
        }

        Self::new(permissions)
    }

    /// Returns whether a concrete permission name is registered.
    #[must_use]
    pub fn exists(&self, name: &PermissionName) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the catalog entry for a name.
    #[must_use]
    pub fn get(&self, name: &PermissionName) -> Option<&Permission> {
        self.by_name.get(name)
    }

    /// Expands a resource prefix into its registered permissions.
    ///
    /// `permissions_by_prefix("org")` returns every `org.<action>` entry.
    #[must_use]
    pub fn permissions_by_prefix(&self, resource: &str) -> Vec<&Permission> {
        self.by_name
            .values()
            .filter(|permission| permission.resource == resource)
            .collect()
    }

    /// Iterates over all registered permissions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.by_name.values()
    }

    /// Returns the number of registered permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
