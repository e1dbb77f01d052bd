//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_override_store;
mod in_memory_permission_cache;
mod in_memory_role_store;
mod postgres_audit_sink;
mod postgres_override_store;
mod postgres_role_store;
mod redis_permission_cache;
mod system_clock;
mod tracing_audit_sink;

pub use in_memory_override_store::InMemoryOverrideStore;
pub use in_memory_permission_cache::InMemoryPermissionCache;
pub use in_memory_role_store::InMemoryRoleStore;
pub use postgres_audit_sink::PostgresAuditSink;
pub use postgres_override_store::PostgresOverrideStore;
pub use postgres_role_store::PostgresRoleStore;
pub use redis_permission_cache::RedisPermissionCache;
pub use system_clock::SystemClock;
pub use tracing_audit_sink::TracingAuditSink;
