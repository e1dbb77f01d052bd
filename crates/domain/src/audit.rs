use serde::{Deserialize, Serialize};

/// Stable audit actions emitted around authorization writes and checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when an authorization decision is recorded by a caller.
    PermissionChecked,
    /// Emitted when a per-user permission override is granted.
    PermissionOverrideGranted,
    /// Emitted when a per-user permission override is revoked.
    PermissionOverrideRevoked,
    /// Emitted when a member is reassigned to a different role.
    MemberRoleAssigned,
    /// Emitted when organization ownership is transferred.
    OwnershipTransferred,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionChecked => "permission.checked",
            Self::PermissionOverrideGranted => "permission.override_granted",
            Self::PermissionOverrideRevoked => "permission.override_revoked",
            Self::MemberRoleAssigned => "member.role_assigned",
            Self::OwnershipTransferred => "org.ownership_transferred",
        }
    }
}
