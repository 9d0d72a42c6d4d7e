//! Resolved tenant context
//!
//! The outcome of resolution, attached to the request for downstream
//! handlers and predicates.

use serde::{Deserialize, Serialize};

use campus_identity::Tenant;

/// Which resolution strategy identified the tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// The `tenant_id` claim of a signed bearer token
    Claim,

    /// The `X-Tenant` header
    Header,

    /// The first label of the request host
    Subdomain,
}

impl ResolutionSource {
    /// Get the string representation of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Header => "header",
            Self::Subdomain => "subdomain",
        }
    }
}

/// A resolved tenant attached to request-scoped context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantContext {
    /// The resolved tenant
    pub tenant: Tenant,

    /// How the tenant was identified
    pub source: ResolutionSource,
}

impl TenantContext {
    /// Create a context from a resolved tenant and its source.
    pub fn new(tenant: Tenant, source: ResolutionSource) -> Self {
        Self { tenant, source }
    }
}
