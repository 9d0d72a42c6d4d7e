//! Tenant resolution
//!
//! Runs once per request, synchronously, before any handler logic. Tries
//! an ordered list of strategies (claim, header, host subdomain); the
//! first to yield a tenant wins and no later strategy runs.

use tracing::debug;

use campus_identity::{IdentityResult, IdentityStore, Tenant};

use crate::context::{ResolutionSource, TenantContext};
use crate::error::{ResolveError, ResolveResult};
use crate::request::RequestParts;
use crate::token::TokenService;

/// Paths always served without a tenant: the administrative console,
/// token issuance, registration, and tenant listing.
const DEFAULT_EXEMPT_PATHS: &[&str] = &[
    "/admin/",
    "/api/v1/auth/token/",
    "/api/v1/auth/register/",
    "/api/v1/tenants/",
];

/// Host labels never treated as tenant subdomains.
const DEFAULT_RESERVED_SUBDOMAINS: &[&str] = &["www", "api"];

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Shared secret for verifying bearer token signatures
    pub secret: String,

    /// Path prefixes exempt from resolution
    pub exempt_paths: Vec<String>,

    /// Host labels excluded from subdomain inference
    pub reserved_subdomains: Vec<String>,
}

impl ResolverConfig {
    /// Create a configuration with the default exempt paths and reserved
    /// subdomains.
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared HMAC secret tokens are signed with
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            exempt_paths: DEFAULT_EXEMPT_PATHS.iter().map(|p| p.to_string()).collect(),
            reserved_subdomains: DEFAULT_RESERVED_SUBDOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Add an exempt path prefix.
    pub fn with_exempt_path(mut self, path: impl Into<String>) -> Self {
        self.exempt_paths.push(path.into());
        self
    }

    /// Add a reserved host label.
    pub fn with_reserved_subdomain(mut self, label: impl Into<String>) -> Self {
        self.reserved_subdomains.push(label.into());
        self
    }
}

/// Resolves the tenant an inbound request operates under.
///
/// Each strategy is stateless and queries the store directly; lookups
/// ignore the tenant's active flag so that an inactive tenant is reported
/// as inactive rather than as not found.
///
/// # Examples
///
/// ```
/// use campus_identity::{IdentityStore, MemoryStore, Tenant};
/// use campus_rbac::RequestMethod;
/// use campus_tenancy::{RequestParts, ResolverConfig, TenantResolver};
///
/// let store = MemoryStore::new();
/// store.insert_tenant(Tenant::new("Acme", "acme")).unwrap();
///
/// let resolver = TenantResolver::new(ResolverConfig::new("shared-secret"));
/// let request = RequestParts::new(RequestMethod::Get, "/api/v1/users/", "campus.example")
///     .with_header("X-Tenant", "acme");
///
/// let context = resolver.resolve(&store, &request).unwrap().unwrap();
/// assert_eq!(context.tenant.subdomain, "acme");
/// ```
#[derive(Debug)]
pub struct TenantResolver {
    config: ResolverConfig,
    tokens: TokenService,
}

impl TenantResolver {
    /// Create a resolver from a configuration.
    pub fn new(config: ResolverConfig) -> Self {
        let tokens = TokenService::with_secret(&config.secret);
        Self { config, tokens }
    }

    /// Resolve the tenant for a request.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` for exempt paths, which proceed with no tenant
    /// - `Ok(Some(context))` when an active tenant is identified
    /// - `Err(TenantNotFound)` when no strategy yields a tenant
    /// - `Err(TenantInactive)` when the identified tenant is disabled
    pub fn resolve<S: IdentityStore>(
        &self,
        store: &S,
        request: &RequestParts,
    ) -> ResolveResult<Option<TenantContext>> {
        if self.is_exempt(&request.path) {
            return Ok(None);
        }

        let strategies: [(
            ResolutionSource,
            fn(&Self, &S, &RequestParts) -> IdentityResult<Option<Tenant>>,
        ); 3] = [
            (ResolutionSource::Claim, Self::from_claim),
            (ResolutionSource::Header, Self::from_header),
            (ResolutionSource::Subdomain, Self::from_subdomain),
        ];

        for (source, strategy) in strategies {
            if let Some(tenant) = strategy(self, store, request)? {
                if !tenant.is_active {
                    debug!(subdomain = %tenant.subdomain, "resolved tenant is inactive");
                    return Err(ResolveError::TenantInactive);
                }
                debug!(subdomain = %tenant.subdomain, source = source.as_str(), "tenant resolved");
                return Ok(Some(TenantContext::new(tenant, source)));
            }
        }

        Err(ResolveError::TenantNotFound)
    }

    /// Check whether a path skips resolution entirely.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.config
            .exempt_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Strategy 1: the `tenant_id` claim of a signed bearer token.
    ///
    /// The signature is verified but expiry is not; a malformed or
    /// unverifiable token is treated as absence of this signal, never as
    /// an error.
    fn from_claim<S: IdentityStore>(
        &self,
        store: &S,
        request: &RequestParts,
    ) -> IdentityResult<Option<Tenant>> {
        let Some(token) = request.bearer_token() else {
            return Ok(None);
        };
        let claims = match self.tokens.decode_without_expiry(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "bearer token unusable for tenant resolution");
                return Ok(None);
            }
        };
        match claims.tenant_id {
            Some(tenant_id) => store.tenant_by_id(tenant_id),
            None => Ok(None),
        }
    }

    /// Strategy 2: the `X-Tenant` header, matched by subdomain.
    fn from_header<S: IdentityStore>(
        &self,
        store: &S,
        request: &RequestParts,
    ) -> IdentityResult<Option<Tenant>> {
        match request.header("X-Tenant") {
            Some(subdomain) => store.tenant_by_subdomain(subdomain),
            None => Ok(None),
        }
    }

    /// Strategy 3: the first label of the request host, when the host has
    /// more than two labels and the label is not reserved.
    fn from_subdomain<S: IdentityStore>(
        &self,
        store: &S,
        request: &RequestParts,
    ) -> IdentityResult<Option<Tenant>> {
        let labels: Vec<&str> = request.host.split('.').collect();
        if labels.len() <= 2 {
            return Ok(None);
        }
        let candidate = labels[0];
        if self
            .config
            .reserved_subdomains
            .iter()
            .any(|reserved| reserved == candidate)
        {
            return Ok(None);
        }
        store.tenant_by_subdomain(candidate)
    }
}
