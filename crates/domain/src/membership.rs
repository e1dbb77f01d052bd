use orgspace_core::{OrgId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// Links one user to one organization with exactly one role.
///
/// The `(org_id, user_id)` pair is unique; role reassignment mutates
/// `role_id` in place. The sole-owner invariant (an organization must keep at
/// least one owner) is enforced by the surrounding CRUD layer; permission
/// resolution works from whatever membership state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    /// Organization scope of the membership.
    pub org_id: OrgId,
    /// Member user.
    pub user_id: UserId,
    /// Role held within the organization.
    pub role_id: RoleId,
    /// Marks the user's default organization for requests without an
    /// explicit organization context.
    pub is_default: bool,
}
