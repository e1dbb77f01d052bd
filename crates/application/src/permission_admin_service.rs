use std::sync::Arc;

use chrono::{DateTime, Utc};
use orgspace_core::{AppError, AppResult, OrgId, UserId};
use orgspace_domain::{AuditAction, PermissionName, PermissionOverride};

use crate::authorization_ports::{AuditEvent, AuditSink, OverrideStore, RoleStore};
use crate::authorization_service::AuthorizationService;

/// Administrative writes with permission implications.
///
/// Every mutation follows the same ordering: persist the write, invalidate
/// the affected cache key, append the audit event, and only then acknowledge.
/// No caller can observe stale permissions for a write this service has
/// reported as committed.
#[derive(Clone)]
pub struct PermissionAdminService {
    authorization: AuthorizationService,
    role_store: Arc<dyn RoleStore>,
    override_store: Arc<dyn OverrideStore>,
    audit_sink: Arc<dyn AuditSink>,
}

impl PermissionAdminService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(
        authorization: AuthorizationService,
        role_store: Arc<dyn RoleStore>,
        override_store: Arc<dyn OverrideStore>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            authorization,
            role_store,
            override_store,
            audit_sink,
        }
    }

    /// Grants a permission override to a user, optionally time-limited.
    pub async fn grant_override(
        &self,
        actor_user_id: UserId,
        org_id: OrgId,
        user_id: UserId,
        permission: PermissionName,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        self.require_security_manage(actor_user_id, org_id).await?;
        self.require_known_permission(&permission)?;

        self.override_store
            .upsert_override(PermissionOverride {
                org_id,
                user_id,
                permission: permission.clone(),
                granted: true,
                expires_at,
            })
            .await?;

        self.authorization
            .invalidate_user(user_id, Some(org_id))
            .await?;

        self.audit_sink
            .record(AuditEvent {
                org_id,
                actor_user_id,
                action: AuditAction::PermissionOverrideGranted,
                resource_type: "permission_override".to_owned(),
                resource_id: format!("{user_id}:{permission}"),
                detail: Some(match expires_at {
                    Some(expires_at) => format!(
                        "granted '{permission}' to '{user_id}' until '{}'",
                        expires_at.to_rfc3339()
                    ),
                    None => format!("granted '{permission}' to '{user_id}'"),
                }),
            })
            .await
    }

    /// Revokes a permission from a user, overriding any role grant.
    pub async fn revoke_override(
        &self,
        actor_user_id: UserId,
        org_id: OrgId,
        user_id: UserId,
        permission: PermissionName,
    ) -> AppResult<()> {
        self.require_security_manage(actor_user_id, org_id).await?;
        self.require_known_permission(&permission)?;

        self.override_store
            .upsert_override(PermissionOverride {
                org_id,
                user_id,
                permission: permission.clone(),
                granted: false,
                expires_at: None,
            })
            .await?;

        self.authorization
            .invalidate_user(user_id, Some(org_id))
            .await?;

        self.audit_sink
            .record(AuditEvent {
                org_id,
                actor_user_id,
                action: AuditAction::PermissionOverrideRevoked,
                resource_type: "permission_override".to_owned(),
                resource_id: format!("{user_id}:{permission}"),
                detail: Some(format!("revoked '{permission}' from '{user_id}'")),
            })
            .await
    }

    /// Reassigns a member to a role, looked up in the organization scope
    /// first and the system scope as a fallback.
    pub async fn assign_role(
        &self,
        actor_user_id: UserId,
        org_id: OrgId,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<()> {
        self.require_security_manage(actor_user_id, org_id).await?;

        let role = match self
            .role_store
            .find_role_by_name(role_name, Some(org_id))
            .await?
        {
            Some(role) => role,
            None => self
                .role_store
                .find_role_by_name(role_name, None)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' not found")))?,
        };

        self.role_store
            .assign_role_to_member(org_id, user_id, role.id)
            .await?;

        self.authorization
            .invalidate_user(user_id, Some(org_id))
            .await?;

        self.audit_sink
            .record(AuditEvent {
                org_id,
                actor_user_id,
                action: AuditAction::MemberRoleAssigned,
                resource_type: "organization_membership".to_owned(),
                resource_id: format!("{user_id}:{role_name}"),
                detail: Some(format!("assigned role '{role_name}' to '{user_id}'")),
            })
            .await
    }

    async fn require_security_manage(&self, actor_user_id: UserId, org_id: OrgId) -> AppResult<()> {
        let manage = PermissionName::new("security.manage")?;
        if self
            .authorization
            .check_single(actor_user_id, org_id, &manage)
            .await?
        {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{actor_user_id}' is missing permission 'security.manage' in organization '{org_id}'"
        )))
    }

    fn require_known_permission(&self, permission: &PermissionName) -> AppResult<()> {
        if self.authorization.catalog().exists(permission) {
            return Ok(());
        }

        Err(AppError::NotFound(format!(
            "permission '{permission}' is not registered in the catalog"
        )))
    }
}
