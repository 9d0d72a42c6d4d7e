//! # Campus Tenancy
//!
//! This crate resolves which tenant an inbound request operates under,
//! before any tenant-scoped operation runs.
//!
//! ## Overview
//!
//! The campus-tenancy crate handles:
//! - **Token claims**: The tenant-enriched JWT claims minted at login
//! - **Token service**: HS256 encode/decode, including the
//!   signature-only decode used by resolution
//! - **Resolution**: The ordered claim / header / subdomain strategy chain
//! - **Context**: The resolved tenant attached to the request
//!
//! ## Resolution order
//!
//! ```text
//! 1. Bearer token `tenant_id` claim (signature checked, expiry not)
//! 2. `X-Tenant` header, matched by subdomain
//! 3. Host subdomain (first label when the host has more than two),
//!    excluding reserved labels
//! ```
//!
//! First match wins. A malformed or unverifiable token is the absence of
//! that signal, not an error; resolution falls through to the next
//! strategy. Exempt paths skip resolution entirely.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_identity::MemoryStore;
//! use campus_rbac::RequestMethod;
//! use campus_tenancy::{RequestParts, ResolverConfig, TenantResolver};
//!
//! let store = MemoryStore::new();
//! let resolver = TenantResolver::new(ResolverConfig::new("shared-secret"));
//!
//! let request = RequestParts::new(RequestMethod::Get, "/api/v1/users/", "acme.campus.example")
//!     .with_header("X-Tenant", "acme");
//! let outcome = resolver.resolve(&store, &request);
//! ```

pub mod claims;
pub mod context;
pub mod error;
pub mod request;
pub mod resolver;
pub mod token;

// Re-export main types for convenience
pub use claims::TenantClaims;
pub use context::{ResolutionSource, TenantContext};
pub use error::{ResolveError, ResolveResult};
pub use request::RequestParts;
pub use resolver::{ResolverConfig, TenantResolver};
pub use token::{TokenError, TokenService};
