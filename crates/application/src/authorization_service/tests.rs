use std::sync::atomic::Ordering;

use orgspace_core::{AppError, OrgId, UserId};
use orgspace_domain::{PermissionOverride, SystemRole};

use crate::test_support::{harness, perm, system_role};

use super::{AuthorizationConfig, Decision, DenyReason};

fn assert_denied_with(decision: &Decision, reason: &DenyReason) {
    assert!(!decision.allowed);
    assert_eq!(decision.deny_reason.as_ref(), Some(reason));
}

#[tokio::test]
async fn member_role_allows_read_and_denies_update() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    let read = harness
        .service
        .authorize(user_id, &[perm("org.read")], Some(org_id))
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert!(read.allowed);
    assert_eq!(read.org_id, Some(org_id));

    let update = harness
        .service
        .authorize(user_id, &[perm("org.update")], Some(org_id))
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert_denied_with(&update, &DenyReason::MissingPermission(perm("org.update")));
}

#[tokio::test]
async fn override_grant_allows_beyond_the_role() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;
    harness.override_store.overrides.lock().await.push(PermissionOverride {
        org_id,
        user_id,
        permission: perm("billing.read"),
        granted: true,
        expires_at: None,
    });

    let decision = harness
        .service
        .authorize(user_id, &[perm("billing.read")], Some(org_id))
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert!(decision.allowed);
}

#[tokio::test]
async fn owner_wildcard_covers_every_org_action() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Owner), true)
        .await;

    for required in ["org.read", "org.delete"] {
        let decision = harness
            .service
            .authorize(user_id, &[perm(required)], Some(org_id))
            .await
            .unwrap_or_else(|error| panic!("authorize: {error}"));
        assert!(decision.allowed, "owner denied '{required}'");
    }
}

#[tokio::test]
async fn missing_org_context_falls_back_to_default_membership() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    let decision = harness
        .service
        .authorize(user_id, &[perm("org.read")], None)
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert!(decision.allowed);
    assert_eq!(decision.org_id, Some(org_id));
}

#[tokio::test]
async fn unresolvable_org_context_is_a_terminal_denial() {
    let harness = harness(AuthorizationConfig::default());

    let decision = harness
        .service
        .authorize(UserId::new(), &[perm("org.read")], None)
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert_denied_with(&decision, &DenyReason::NoOrganizationContext);
    assert_eq!(decision.org_id, None);
}

#[tokio::test]
async fn require_explicit_org_disables_default_fallback() {
    let harness = harness(AuthorizationConfig {
        require_explicit_org: true,
        ..AuthorizationConfig::default()
    });
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    let decision = harness
        .service
        .authorize(user_id, &[perm("org.read")], None)
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert_denied_with(&decision, &DenyReason::NoOrganizationContext);
}

#[tokio::test]
async fn unknown_permission_is_never_satisfied() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    // Owner holds resource wildcards, yet an unregistered name cannot be
    // granted by anything.
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Owner), true)
        .await;

    let decision = harness
        .service
        .authorize(user_id, &[perm("org.explode")], Some(org_id))
        .await
        .unwrap_or_else(|error| panic!("authorize: {error}"));
    assert_denied_with(&decision, &DenyReason::UnknownPermission(perm("org.explode")));

    let single = harness
        .service
        .check_single(user_id, org_id, &perm("org.explode"))
        .await
        .unwrap_or_else(|error| panic!("check_single: {error}"));
    assert!(!single);
}

#[tokio::test]
async fn cache_hit_skips_repeated_resolution() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    for _ in 0..3 {
        let decision = harness
            .service
            .authorize(user_id, &[perm("org.read")], Some(org_id))
            .await
            .unwrap_or_else(|error| panic!("authorize: {error}"));
        assert!(decision.allowed);
    }

    assert_eq!(harness.role_store.membership_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_ttl_disables_caching() {
    let harness = harness(AuthorizationConfig {
        cache_ttl_seconds: 0,
        ..AuthorizationConfig::default()
    });
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    for _ in 0..2 {
        let _ = harness
            .service
            .authorize(user_id, &[perm("org.read")], Some(org_id))
            .await
            .unwrap_or_else(|error| panic!("authorize: {error}"));
    }

    assert_eq!(harness.role_store.membership_reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalidation_forces_the_next_lookup_to_miss() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;

    let _ = harness
        .service
        .effective_permissions(user_id, org_id)
        .await
        .unwrap_or_else(|error| panic!("effective_permissions: {error}"));
    assert!(harness.cache.entries.lock().await.contains_key(&(user_id, org_id)));

    harness
        .service
        .invalidate_user(user_id, Some(org_id))
        .await
        .unwrap_or_else(|error| panic!("invalidate_user: {error}"));
    assert!(!harness.cache.entries.lock().await.contains_key(&(user_id, org_id)));
}

#[tokio::test]
async fn user_wide_invalidation_spans_organizations() {
    let harness = harness(AuthorizationConfig::default());
    let user_id = UserId::new();
    let first_org = OrgId::new();
    let second_org = OrgId::new();
    let member = system_role(SystemRole::Member);
    harness
        .role_store
        .add_member(first_org, user_id, &member, true)
        .await;
    harness
        .role_store
        .add_member(second_org, user_id, &member, false)
        .await;

    for org_id in [first_org, second_org] {
        let _ = harness
            .service
            .effective_permissions(user_id, org_id)
            .await
            .unwrap_or_else(|error| panic!("effective_permissions: {error}"));
    }

    harness
        .service
        .invalidate_user(user_id, None)
        .await
        .unwrap_or_else(|error| panic!("invalidate_user: {error}"));
    assert!(harness.cache.entries.lock().await.is_empty());
}

#[tokio::test]
async fn storage_failure_propagates_instead_of_denying() {
    let harness = harness(AuthorizationConfig::default());
    let org_id = OrgId::new();
    let user_id = UserId::new();
    harness
        .role_store
        .add_member(org_id, user_id, &system_role(SystemRole::Member), true)
        .await;
    harness.role_store.unavailable.store(true, Ordering::SeqCst);

    let result = harness
        .service
        .authorize(user_id, &[perm("org.read")], Some(org_id))
        .await;
    assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
}
