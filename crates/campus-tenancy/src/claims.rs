//! Token claims with tenant enrichment
//!
//! Claims minted at login carry the user's tenant alongside the standard
//! registered claims, so the tenant can later be recovered from the token
//! alone during resolution.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_identity::{Tenant, User};

/// JWT claims carrying tenant identity.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use uuid::Uuid;
/// use campus_tenancy::TenantClaims;
///
/// let claims = TenantClaims::new(Uuid::now_v7(), Duration::hours(1));
/// assert!(!claims.is_expired());
/// assert!(claims.tenant_id.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantClaims {
    /// Subject (user ID as string)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// The tenant the subject belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,

    /// The tenant's subdomain, for display and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_subdomain: Option<String>,

    /// The subject's username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// The subject's email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl TenantClaims {
    /// Create new claims for a subject.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's unique identifier
    /// * `ttl` - How long the token should be valid
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            tenant_id: None,
            tenant_subdomain: None,
            username: None,
            email: None,
        }
    }

    /// Create fully enriched claims for a user in their tenant.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `tenant` - The user's tenant
    /// * `ttl` - How long the token should be valid
    pub fn for_user(user: &User, tenant: &Tenant, ttl: Duration) -> Self {
        Self::new(user.id, ttl)
            .with_tenant(tenant)
            .with_identity(&user.username, &user.email)
    }

    /// Attach the tenant id and subdomain.
    pub fn with_tenant(mut self, tenant: &Tenant) -> Self {
        self.tenant_id = Some(tenant.id);
        self.tenant_subdomain = Some(tenant.subdomain.clone());
        self
    }

    /// Attach the subject's username and email.
    pub fn with_identity(mut self, username: impl Into<String>, email: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.email = Some(email.into());
        self
    }

    /// Get the subject as a UUID, if it parses as one.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the claims are expired.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_enrichment() {
        let tenant = Tenant::new("Acme", "acme");
        let user = User::new(tenant.id, "alice", "alice@acme.example");

        let claims = TenantClaims::for_user(&user, &tenant, Duration::hours(1));

        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.tenant_id, Some(tenant.id));
        assert_eq!(claims.tenant_subdomain.as_deref(), Some("acme"));
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.email.as_deref(), Some("alice@acme.example"));
    }

    #[test]
    fn test_expiry() {
        let fresh = TenantClaims::new(Uuid::now_v7(), Duration::hours(1));
        assert!(!fresh.is_expired());

        let stale = TenantClaims::new(Uuid::now_v7(), Duration::hours(-1));
        assert!(stale.is_expired());
    }
}
