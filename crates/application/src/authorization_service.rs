use std::env;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use orgspace_core::{AppError, AppResult, OrgId, UserId};
use orgspace_domain::{EffectivePermissionSet, PermissionCatalog, PermissionName};

use crate::authorization_ports::{PermissionCache, RoleStore};
use crate::permission_resolver::PermissionResolver;

/// Tunables for the authorization gate.
#[derive(Debug, Clone)]
pub struct AuthorizationConfig {
    /// Cache TTL for resolved permission sets, in seconds. Zero disables
    /// caching.
    pub cache_ttl_seconds: u32,
    /// When true, requests without an explicit organization are denied
    /// instead of falling back to the user's default organization.
    pub require_explicit_org: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 300,
            require_explicit_org: false,
        }
    }
}

impl AuthorizationConfig {
    /// Loads configuration from `AUTHZ_CACHE_TTL_SECONDS` and
    /// `AUTHZ_REQUIRE_EXPLICIT_ORG`, keeping defaults for unset variables.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("AUTHZ_CACHE_TTL_SECONDS") {
            config.cache_ttl_seconds = value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid AUTHZ_CACHE_TTL_SECONDS '{value}': {error}"))
            })?;
        }

        if let Ok(value) = env::var("AUTHZ_REQUIRE_EXPLICIT_ORG") {
            config.require_explicit_org = value.eq_ignore_ascii_case("true");
        }

        Ok(config)
    }
}

/// Why an authorization decision was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No explicit organization was given and no default could be resolved.
    NoOrganizationContext,
    /// A required permission is not registered in the catalog; nothing can
    /// grant an undefined permission, not even the global wildcard.
    UnknownPermission(PermissionName),
    /// The effective set does not satisfy the named permission.
    MissingPermission(PermissionName),
}

impl Display for DenyReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOrganizationContext => write!(formatter, "no organization context"),
            Self::UnknownPermission(name) => write!(formatter, "unknown permission '{name}'"),
            Self::MissingPermission(name) => write!(formatter, "missing permission '{name}'"),
        }
    }
}

/// Outcome of one authorization check.
///
/// A denial is a valid decision, not an error; storage failures surface as
/// `Err` so callers can distinguish "cannot decide" from "denied".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether every required permission was satisfied.
    pub allowed: bool,
    /// The organization the decision applies to, when one was resolvable.
    pub org_id: Option<OrgId>,
    /// The effective set the requirement was evaluated against; empty when
    /// evaluation was short-circuited by a terminal denial.
    pub effective: EffectivePermissionSet,
    /// Populated for denied decisions.
    pub deny_reason: Option<DenyReason>,
}

impl Decision {
    fn allowed(org_id: OrgId, effective: EffectivePermissionSet) -> Self {
        Self {
            allowed: true,
            org_id: Some(org_id),
            effective,
            deny_reason: None,
        }
    }

    fn denied(
        org_id: Option<OrgId>,
        effective: EffectivePermissionSet,
        reason: DenyReason,
    ) -> Self {
        Self {
            allowed: false,
            org_id,
            effective,
            deny_reason: Some(reason),
        }
    }
}

/// Request-time authorization gate.
///
/// Resolves the organization context, consults the cache (resolving and
/// backfilling on miss), and evaluates the required permissions. Audit
/// emission is the caller's responsibility through the
/// [`crate::authorization_ports::AuditSink`] port.
#[derive(Clone)]
pub struct AuthorizationService {
    catalog: Arc<PermissionCatalog>,
    resolver: PermissionResolver,
    role_store: Arc<dyn RoleStore>,
    cache: Arc<dyn PermissionCache>,
    config: AuthorizationConfig,
}

impl AuthorizationService {
    /// Creates the gate from its collaborators.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        resolver: PermissionResolver,
        role_store: Arc<dyn RoleStore>,
        cache: Arc<dyn PermissionCache>,
        config: AuthorizationConfig,
    ) -> Self {
        Self {
            catalog,
            resolver,
            role_store,
            cache,
            config,
        }
    }

    /// Decides whether a user holds every required permission.
    ///
    /// With no `explicit_org`, the user's default organization is used unless
    /// `require_explicit_org` is set; an unresolvable organization yields a
    /// terminal [`DenyReason::NoOrganizationContext`] denial.
    pub async fn authorize(
        &self,
        user_id: UserId,
        required: &[PermissionName],
        explicit_org: Option<OrgId>,
    ) -> AppResult<Decision> {
        let org_id = match self.resolve_org_context(user_id, explicit_org).await? {
            Some(org_id) => org_id,
            None => {
                return Ok(Decision::denied(
                    None,
                    EffectivePermissionSet::new(),
                    DenyReason::NoOrganizationContext,
                ));
            }
        };

        if let Some(unknown) = required.iter().find(|name| !self.catalog.exists(name)) {
            return Ok(Decision::denied(
                Some(org_id),
                EffectivePermissionSet::new(),
                DenyReason::UnknownPermission(unknown.clone()),
            ));
        }

        let effective = self.effective_permissions(user_id, org_id).await?;

        match effective.first_unsatisfied(required) {
            None => Ok(Decision::allowed(org_id, effective)),
            Some(missing) => {
                let reason = DenyReason::MissingPermission(missing.clone());
                Ok(Decision::denied(Some(org_id), effective, reason))
            }
        }
    }

    /// Returns whether a user holds a single permission in one organization.
    pub async fn check_single(
        &self,
        user_id: UserId,
        org_id: OrgId,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        if !self.catalog.exists(permission) {
            return Ok(false);
        }

        let effective = self.effective_permissions(user_id, org_id).await?;
        Ok(effective.satisfies(permission))
    }

    /// Returns the effective permission set, from cache when fresh.
    ///
    /// The cache lock is internal to its adapter and is never held across
    /// store I/O: look up, release, resolve, re-acquire to backfill.
    pub async fn effective_permissions(
        &self,
        user_id: UserId,
        org_id: OrgId,
    ) -> AppResult<EffectivePermissionSet> {
        if let Some(cached) = self.cache.get(user_id, org_id).await? {
            return Ok(cached);
        }

        let resolved = self.resolver.resolve(user_id, org_id).await?;
        self.cache
            .put(
                user_id,
                org_id,
                resolved.clone(),
                self.config.cache_ttl_seconds,
            )
            .await?;

        Ok(resolved)
    }

    /// Drops cached sets for a user, scoped to one organization when given.
    ///
    /// Every component that mutates roles, overrides, or ownership must call
    /// this before acknowledging its write.
    pub async fn invalidate_user(&self, user_id: UserId, org_id: Option<OrgId>) -> AppResult<()> {
        match org_id {
            Some(org_id) => self.cache.invalidate(user_id, org_id).await,
            None => self.cache.invalidate_all_for_user(user_id).await,
        }
    }

    /// Returns the catalog the gate validates requirements against.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        self.catalog.as_ref()
    }

    async fn resolve_org_context(
        &self,
        user_id: UserId,
        explicit_org: Option<OrgId>,
    ) -> AppResult<Option<OrgId>> {
        if let Some(org_id) = explicit_org {
            return Ok(Some(org_id));
        }

        if self.config.require_explicit_org {
            return Ok(None);
        }

        Ok(self
            .role_store
            .find_default_membership(user_id)
            .await?
            .map(|membership| membership.org_id))
    }
}

#[cfg(test)]
mod tests;
