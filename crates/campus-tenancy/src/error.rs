//! Error types for tenant resolution
//!
//! Resolution failures are surfaced to the caller before any business
//! logic runs; they are never retried.

use thiserror::Error;

use campus_identity::IdentityError;

/// Tenant resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No tenant could be identified from any resolution strategy
    #[error("Tenant not found or invalid")]
    TenantNotFound,

    /// A tenant was identified but its active flag is cleared
    #[error("This tenant account is inactive")]
    TenantInactive,

    /// The identity store failed during a lookup
    #[error(transparent)]
    Store(#[from] IdentityError),
}

/// Result type for tenant resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

impl ResolveError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ResolveError::TenantNotFound => 400,
            ResolveError::TenantInactive => 403,
            ResolveError::Store(err) => err.status_code(),
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ResolveError::TenantNotFound => "TENANT_NOT_FOUND",
            ResolveError::TenantInactive => "TENANT_INACTIVE",
            ResolveError::Store(_) => "STORE_ERROR",
        }
    }
}
