//! Audit sink for development. Logs events to tracing output.

use async_trait::async_trait;
use tracing::info;

use orgspace_application::{AuditEvent, AuditSink};
use orgspace_core::AppResult;

/// Development audit sink that logs events instead of persisting them.
#[derive(Clone)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates a new tracing audit sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            org_id = %event.org_id,
            actor_user_id = %event.actor_user_id,
            action = event.action.as_str(),
            resource_type = event.resource_type.as_str(),
            resource_id = event.resource_id.as_str(),
            detail = event.detail.as_deref(),
            "audit event"
        );

        Ok(())
    }
}
