use std::collections::BTreeSet;

use orgspace_core::{AppResult, OrgId, RoleId};
use serde::{Deserialize, Serialize};

use crate::permission::PermissionName;

/// A role granting a set of permissions within organization scope.
///
/// Roles with `org_id = None` are system roles shared as templates across all
/// organizations. System role immutability is enforced by policy in the
/// administrative layer, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name within its scope.
    pub name: String,
    /// Owning organization; `None` marks a system role.
    pub org_id: Option<OrgId>,
    /// Indicates a built-in, process-wide role.
    pub is_system: bool,
    /// Indicates the default role assigned to new members.
    pub is_default: bool,
    /// Granted permission names, wildcards included.
    pub permissions: BTreeSet<PermissionName>,
}

impl Role {
    /// Returns whether the role is scoped to one organization.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.org_id.is_some()
    }
}

/// Built-in system roles shared across all organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    /// Full organization control.
    Owner,
    /// Manage organization and members.
    Admin,
    /// Basic access to organization.
    Member,
}

impl SystemRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Returns all system roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemRole] = &[SystemRole::Owner, SystemRole::Admin, SystemRole::Member];

        ALL
    }

    /// Builds the role template with its seed grants.
    ///
    /// The owner template carries one resource wildcard per platform resource;
    /// admin and member carry concrete grants.
    pub fn template(self) -> AppResult<Role> {
        let grants: &[&str] = match self {
            Self::Owner => &[
                "org.*",
                "members.*",
                "invitations.*",
                "billing.*",
                "api_keys.*",
                "audit.*",
                "security.*",
            ],
            Self::Admin => &[
                "org.read",
                "org.update",
                "members.read",
                "members.invite",
                "members.update",
                "members.remove",
                "invitations.create",
                "invitations.read",
                "invitations.revoke",
                "api_keys.create",
                "api_keys.read",
                "api_keys.revoke",
                "audit.read",
            ],
            Self::Member => &[
                "org.read",
                "members.read",
                "invitations.read",
                "api_keys.read",
            ],
        };

        let mut permissions = BTreeSet::new();
        for grant in grants {
            permissions.insert(PermissionName::new(*grant)?);
        }

        Ok(Role {
            id: RoleId::new(),
            name: self.as_str().to_owned(),
            org_id: None,
            is_system: true,
            is_default: self == Self::Member,
            permissions,
        })
    }
}
