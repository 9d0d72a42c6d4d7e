//! End-to-end tests for tenant resolution.
//!
//! These tests exercise the full strategy chain against a populated
//! in-memory store: claim-based resolution from signed tokens, explicit
//! `X-Tenant` headers, host-subdomain inference, exemption, and rejection
//! of inactive tenants.

use chrono::Duration;
use uuid::Uuid;

use campus_identity::{IdentityStore, MemoryStore, Tenant};
use campus_rbac::RequestMethod;
use campus_tenancy::{
    RequestParts, ResolutionSource, ResolveError, ResolverConfig, TenantClaims, TenantResolver,
    TokenService,
};

const SECRET: &str = "resolution-e2e-secret-of-at-least-32-chars";

/// Test fixture with a store holding two tenants, one inactive.
struct TestFixture {
    store: MemoryStore,
    resolver: TenantResolver,
    tokens: TokenService,
    tenant1: Tenant,
}

impl TestFixture {
    fn new() -> Self {
        let store = MemoryStore::new();
        let tenant1 = store
            .insert_tenant(Tenant::new("Tenant One", "tenant1"))
            .unwrap();

        let mut dormant = Tenant::new("Dormant", "dormant");
        dormant.is_active = false;
        store.insert_tenant(dormant).unwrap();

        Self {
            store,
            resolver: TenantResolver::new(ResolverConfig::new(SECRET)),
            tokens: TokenService::with_secret(SECRET),
            tenant1,
        }
    }

    fn request(&self, path: &str, host: &str) -> RequestParts {
        RequestParts::new(RequestMethod::Get, path, host)
    }
}

#[test]
fn test_header_resolution_without_bearer_token() {
    let f = TestFixture::new();
    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("X-Tenant", "tenant1");

    let context = f.resolver.resolve(&f.store, &request).unwrap().unwrap();
    assert_eq!(context.tenant.id, f.tenant1.id);
    assert_eq!(context.source, ResolutionSource::Header);
}

#[test]
fn test_inactive_tenant_is_rejected_as_inactive() {
    let f = TestFixture::new();
    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("X-Tenant", "dormant");

    let err = f.resolver.resolve(&f.store, &request).unwrap_err();
    assert!(matches!(err, ResolveError::TenantInactive));
    assert_eq!(err.status_code(), 403);
}

#[test]
fn test_claim_takes_priority_over_header() {
    let f = TestFixture::new();
    let other = f
        .store
        .insert_tenant(Tenant::new("Tenant Two", "tenant2"))
        .unwrap();

    let token = f
        .tokens
        .mint(
            &TenantClaims::new(Uuid::now_v7(), Duration::hours(1)).with_tenant(&other),
        )
        .unwrap();

    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("Authorization", format!("Bearer {token}"))
        .with_header("X-Tenant", "tenant1");

    let context = f.resolver.resolve(&f.store, &request).unwrap().unwrap();
    assert_eq!(context.tenant.id, other.id);
    assert_eq!(context.source, ResolutionSource::Claim);
}

#[test]
fn test_expired_token_still_resolves_tenant() {
    let f = TestFixture::new();
    let token = f
        .tokens
        .mint(
            &TenantClaims::new(Uuid::now_v7(), Duration::hours(-1)).with_tenant(&f.tenant1),
        )
        .unwrap();

    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("Authorization", format!("Bearer {token}"));

    let context = f.resolver.resolve(&f.store, &request).unwrap().unwrap();
    assert_eq!(context.tenant.id, f.tenant1.id);
    assert_eq!(context.source, ResolutionSource::Claim);
}

#[test]
fn test_malformed_token_falls_through_to_header() {
    let f = TestFixture::new();
    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("Authorization", "Bearer not.a.token")
        .with_header("X-Tenant", "tenant1");

    let context = f.resolver.resolve(&f.store, &request).unwrap().unwrap();
    assert_eq!(context.tenant.id, f.tenant1.id);
    assert_eq!(context.source, ResolutionSource::Header);
}

#[test]
fn test_token_signed_with_wrong_secret_falls_through() {
    let f = TestFixture::new();
    let forger = TokenService::with_secret("a-completely-different-32-char-secret!!!");
    let token = forger
        .mint(&TenantClaims::new(Uuid::now_v7(), Duration::hours(1)).with_tenant(&f.tenant1))
        .unwrap();

    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("Authorization", format!("Bearer {token}"));

    // Signal swallowed, nothing else identifies a tenant.
    assert!(matches!(
        f.resolver.resolve(&f.store, &request),
        Err(ResolveError::TenantNotFound)
    ));
}

#[test]
fn test_token_without_tenant_claim_falls_through() {
    let f = TestFixture::new();
    let token = f
        .tokens
        .mint(&TenantClaims::new(Uuid::now_v7(), Duration::hours(1)))
        .unwrap();

    let request = f
        .request("/api/v1/users/", "tenant1.campus.example")
        .with_header("Authorization", format!("Bearer {token}"));

    let context = f.resolver.resolve(&f.store, &request).unwrap().unwrap();
    assert_eq!(context.source, ResolutionSource::Subdomain);
}

#[test]
fn test_subdomain_inference_needs_three_labels() {
    let f = TestFixture::new();

    let inferred = f.request("/api/v1/users/", "tenant1.campus.example");
    let context = f.resolver.resolve(&f.store, &inferred).unwrap().unwrap();
    assert_eq!(context.tenant.id, f.tenant1.id);

    let bare = f.request("/api/v1/users/", "campus.example");
    assert!(matches!(
        f.resolver.resolve(&f.store, &bare),
        Err(ResolveError::TenantNotFound)
    ));
}

#[test]
fn test_reserved_labels_never_resolve() {
    let f = TestFixture::new();

    for host in ["www.campus.example", "api.campus.example"] {
        let request = f.request("/api/v1/users/", host);
        assert!(matches!(
            f.resolver.resolve(&f.store, &request),
            Err(ResolveError::TenantNotFound)
        ));
    }
}

#[test]
fn test_exempt_paths_resolve_to_none() {
    let f = TestFixture::new();

    // Even with a valid tenant signal present, exempt paths skip the chain.
    let request = f
        .request("/api/v1/auth/register/", "tenant1.campus.example")
        .with_header("X-Tenant", "tenant1");
    assert!(f.resolver.resolve(&f.store, &request).unwrap().is_none());
}

#[test]
fn test_unknown_subdomain_in_header_is_not_found() {
    let f = TestFixture::new();
    let request = f
        .request("/api/v1/users/", "campus.example")
        .with_header("X-Tenant", "nope");

    let err = f.resolver.resolve(&f.store, &request).unwrap_err();
    assert!(matches!(err, ResolveError::TenantNotFound));
    assert_eq!(err.status_code(), 400);
}
