//! # Campus Identity
//!
//! This crate provides the multi-tenant identity and credential store for the
//! Campus platform, shared across the tenancy, authorization, and service
//! layers.
//!
//! ## Overview
//!
//! The campus-identity crate handles:
//! - **Tenants**: Isolated organizations with settings and subscription plans
//! - **Users**: Accounts scoped to exactly one tenant
//! - **Roles**: Named, tenant-scoped permission-token bundles
//! - **Role assignments**: Grant records linking users to roles within a tenant
//! - **Store**: The `IdentityStore` trait and a transactional in-memory store
//!
//! ## Architecture
//!
//! ```text
//! Tenant
//!   ├─ Users (per-tenant unique username/email)
//!   ├─ Roles (per-tenant unique name; permission-token sets)
//!   └─ RoleAssignments ─→ (User, Role, assigned_by?)
//! ```
//!
//! Uniqueness is per tenant: the same username or email may exist in two
//! different tenants without conflict.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_identity::{MemoryStore, IdentityStore, Tenant, User};
//!
//! let store = MemoryStore::new();
//! let tenant = store.insert_tenant(Tenant::new("Test Co", "test-co")).unwrap();
//! let user = User::new(tenant.id, "alice", "alice@test-co.example");
//! store.insert_user(user).unwrap();
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `campus-rbac`: Permission predicates evaluated against the store
//! - `campus-tenancy`: Tenant resolution from inbound requests
//! - `campus-services`: User, role, and tenant lifecycle workflows

pub mod assignment;
pub mod error;
pub mod memory;
pub mod plan;
pub mod role;
pub mod store;
pub mod tenant;
pub mod user;

// Re-export main types for convenience
pub use assignment::RoleAssignment;
pub use error::{IdentityError, IdentityResult};
pub use memory::MemoryStore;
pub use plan::SubscriptionPlan;
pub use role::{Role, RoleName};
pub use store::IdentityStore;
pub use tenant::{validate_subdomain, NewTenant, Tenant};
pub use user::{NewUser, User, UserPatch};
