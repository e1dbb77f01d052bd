//! Application services for multi-tenant authorization.
//!
//! Services orchestrate domain rules over ports implemented by the
//! infrastructure crate: role and override stores, the permission cache,
//! the audit sink, and a clock.
#![forbid(unsafe_code)]

pub mod authorization_ports;
pub mod authorization_service;
pub mod permission_admin_service;
pub mod permission_resolver;

#[cfg(test)]
mod test_support;

pub use authorization_ports::{
    AuditEvent, AuditSink, Clock, OverrideStore, PermissionCache, RoleStore,
};
pub use authorization_service::{
    AuthorizationConfig, AuthorizationService, Decision, DenyReason,
};
pub use permission_admin_service::PermissionAdminService;
pub use permission_resolver::PermissionResolver;
