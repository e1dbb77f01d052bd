//! Shared fakes and fixtures for service tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use orgspace_core::{AppError, AppResult, OrgId, RoleId, UserId};
use orgspace_domain::{
    EffectivePermissionSet, OrganizationMembership, PermissionCatalog, PermissionName,
    PermissionOverride, Role, SystemRole,
};

use crate::authorization_ports::{
    AuditEvent, AuditSink, Clock, OverrideStore, PermissionCache, RoleStore,
};
use crate::authorization_service::{AuthorizationConfig, AuthorizationService};
use crate::permission_resolver::PermissionResolver;

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct FakeRoleStore {
    pub(crate) memberships: Mutex<HashMap<(OrgId, UserId), OrganizationMembership>>,
    pub(crate) roles: Mutex<HashMap<RoleId, Role>>,
    pub(crate) membership_reads: AtomicUsize,
    pub(crate) unavailable: AtomicBool,
}

impl FakeRoleStore {
    pub(crate) async fn add_member(
        &self,
        org_id: OrgId,
        user_id: UserId,
        role: &Role,
        is_default: bool,
    ) {
        self.roles.lock().await.insert(role.id, role.clone());
        self.memberships.lock().await.insert(
            (org_id, user_id),
            OrganizationMembership {
                org_id,
                user_id,
                role_id: role.id,
                is_default,
            },
        );
    }
}

#[async_trait]
impl RoleStore for FakeRoleStore {
    async fn find_membership(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StorageUnavailable("role store down".to_owned()));
        }
        self.membership_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.memberships.lock().await.get(&(org_id, user_id)).copied())
    }

    async fn find_default_membership(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<OrganizationMembership>> {
        Ok(self
            .memberships
            .lock()
            .await
            .values()
            .find(|membership| membership.user_id == user_id && membership.is_default)
            .copied())
    }

    async fn get_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionName>> {
        Ok(self
            .roles
            .lock()
            .await
            .get(&role_id)
            .map(|role| role.permissions.clone())
            .unwrap_or_default())
    }

    async fn find_role_by_name(
        &self,
        name: &str,
        org_id: Option<OrgId>,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .values()
            .find(|role| role.name == name && role.org_id == org_id)
            .cloned())
    }

    async fn assign_role_to_member(
        &self,
        org_id: OrgId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut memberships = self.memberships.lock().await;
        match memberships.get_mut(&(org_id, user_id)) {
            Some(membership) => {
                membership.role_id = role_id;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "no membership for user '{user_id}' in organization '{org_id}'"
            ))),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeOverrideStore {
    pub(crate) overrides: Mutex<Vec<PermissionOverride>>,
}

#[async_trait]
impl OverrideStore for FakeOverrideStore {
    async fn list_active_overrides(
        &self,
        org_id: OrgId,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionOverride>> {
        Ok(self
            .overrides
            .lock()
            .await
            .iter()
            .filter(|entry| {
                entry.org_id == org_id && entry.user_id == user_id && entry.is_active(as_of)
            })
            .cloned()
            .collect())
    }

    async fn upsert_override(&self, entry: PermissionOverride) -> AppResult<()> {
        let mut overrides = self.overrides.lock().await;
        overrides.retain(|existing| {
            !(existing.org_id == entry.org_id
                && existing.user_id == entry.user_id
                && existing.permission == entry.permission)
        });
        overrides.push(entry);
        Ok(())
    }
}

/// TTL-free cache fake; expiry behavior is covered by the in-memory adapter
/// tests in the infrastructure crate.
#[derive(Default)]
pub(crate) struct FakeCache {
    pub(crate) entries: Mutex<HashMap<(UserId, OrgId), EffectivePermissionSet>>,
}

#[async_trait]
impl PermissionCache for FakeCache {
    async fn get(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<Option<EffectivePermissionSet>> {
        Ok(self.entries.lock().await.get(&(user_id, org_id)).cloned())
    }

    async fn put(
        &self,
        user_id: UserId,
        org_id: OrgId,
        permissions: EffectivePermissionSet,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        self.entries
            .lock()
            .await
            .insert((user_id, org_id), permissions);
        Ok(())
    }

    async fn invalidate(&self, user_id: UserId, org_id: OrgId) -> AppResult<()> {
        self.entries.lock().await.remove(&(user_id, org_id));
        Ok(())
    }

    async fn invalidate_all_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .retain(|(stored_user_id, _), _| stored_user_id != &user_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditSink {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditSink for FakeAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

pub(crate) fn perm(value: &str) -> PermissionName {
    PermissionName::new(value).unwrap_or_else(|error| panic!("fixture permission: {error}"))
}

pub(crate) fn system_role(role: SystemRole) -> Role {
    role.template()
        .unwrap_or_else(|error| panic!("system role template: {error}"))
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp"))
}

pub(crate) struct Harness {
    pub(crate) service: AuthorizationService,
    pub(crate) role_store: Arc<FakeRoleStore>,
    pub(crate) override_store: Arc<FakeOverrideStore>,
    pub(crate) cache: Arc<FakeCache>,
}

pub(crate) fn harness(config: AuthorizationConfig) -> Harness {
    let role_store = Arc::new(FakeRoleStore::default());
    let override_store = Arc::new(FakeOverrideStore::default());
    let cache = Arc::new(FakeCache::default());
    let catalog = Arc::new(
        PermissionCatalog::builtin().unwrap_or_else(|error| panic!("builtin catalog: {error}")),
    );

    let resolver = PermissionResolver::new(
        role_store.clone(),
        override_store.clone(),
        Arc::new(FixedClock(fixed_now())),
    );
    let service = AuthorizationService::new(
        catalog,
        resolver,
        role_store.clone(),
        cache.clone(),
        config,
    );

    Harness {
        service,
        role_store,
        override_store,
        cache,
    }
}
