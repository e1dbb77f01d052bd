use async_trait::async_trait;
use orgspace_core::{AppResult, OrgId, UserId};
use orgspace_domain::AuditAction;

/// Immutable audit event payload emitted around authorization writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Organization scope for the event.
    pub org_id: OrgId,
    /// User that performed the action.
    pub actor_user_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
///
/// Fire-and-forget from the decision path's perspective: authorization
/// decisions never depend on audit success.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persists one audit event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}
