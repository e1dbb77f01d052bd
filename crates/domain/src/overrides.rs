use chrono::{DateTime, Utc};
use orgspace_core::{OrgId, UserId};
use serde::{Deserialize, Serialize};

use crate::permission::PermissionName;

/// A per-user, per-organization permission exception.
///
/// Overrides take precedence over role-derived permissions for the same
/// name: `granted = true` adds the permission, `granted = false` removes it.
/// The `(org_id, user_id, permission)` triple is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    /// Organization scope of the override.
    pub org_id: OrgId,
    /// Affected user.
    pub user_id: UserId,
    /// Permission the override targets.
    pub permission: PermissionName,
    /// Whether the permission is granted or revoked.
    pub granted: bool,
    /// Optional expiry; an expired override is treated as absent regardless
    /// of `granted`.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PermissionOverride {
    /// Returns whether the override applies at the given instant.
    #[must_use]
    pub fn is_active(&self, as_of: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > as_of)
    }
}
