//! Domain entities and invariants for the Orgspace authorization core.

#![forbid(unsafe_code)]

mod audit;
mod catalog;
mod effective;
mod membership;
mod overrides;
mod permission;
mod role;

pub use audit::AuditAction;
pub use catalog::PermissionCatalog;
pub use effective::EffectivePermissionSet;
pub use membership::OrganizationMembership;
pub use overrides::PermissionOverride;
pub use permission::{GLOBAL_WILDCARD, Permission, PermissionName};
pub use role::{Role, SystemRole};
