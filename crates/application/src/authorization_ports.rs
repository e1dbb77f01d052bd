//! Ports consumed by the authorization services.

mod audit;
mod cache;
mod clock;
mod stores;

pub use audit::{AuditEvent, AuditSink};
pub use cache::PermissionCache;
pub use clock::Clock;
pub use stores::{OverrideStore, RoleStore};
