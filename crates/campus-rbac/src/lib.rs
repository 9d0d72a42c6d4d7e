//! # Campus RBAC (Role-Based Access Control)
//!
//! This crate provides access-control predicates for the Campus platform,
//! evaluated against the identity store from `campus-identity`.
//!
//! ## Overview
//!
//! The campus-rbac crate handles:
//! - **Predicates**: Named access rules (tenant membership, role checks,
//!   permission-token checks, ownership, read-only)
//! - **Guards**: AND-compositions of predicates attached to an operation
//! - **Access requests**: The actor/tenant/method/target tuple a predicate
//!   inspects
//!
//! ## Architecture
//!
//! ```text
//! AccessRequest = actor + tenant + method [+ target]
//!
//! Guard::new()
//!     .require(Predicate::TenantMember)
//!     .require(Predicate::CanManageUsers)
//! ```
//!
//! Every predicate in a guard must pass; the first failing predicate's name
//! is surfaced in the denial so callers can log or report it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_identity::MemoryStore;
//! use campus_rbac::{AccessRequest, Guard, Predicate, RequestMethod};
//!
//! let store = MemoryStore::new();
//! let guard = Guard::new()
//!     .require(Predicate::TenantMember)
//!     .require(Predicate::AdminRole);
//!
//! let request = AccessRequest::anonymous(RequestMethod::Get);
//! assert!(guard.check(&store, &request).is_err());
//! ```

pub mod guard;
pub mod predicates;
pub mod request;

// Re-export main types for convenience
pub use guard::{AccessError, Guard};
pub use predicates::{AccessRequest, Owned, Predicate};
pub use request::RequestMethod;
