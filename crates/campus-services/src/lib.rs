//! # Campus Services
//!
//! This crate provides the lifecycle workflows of the Campus platform:
//! user creation and password management, role assignment, and tenant
//! provisioning, orchestrating the identity store and enforcing
//! cross-entity invariants transactionally.
//!
//! ## Overview
//!
//! The campus-services crate handles:
//! - **User service**: registration, field-level updates, soft delete,
//!   verified password changes
//! - **Role service**: idempotent role assignment, removal, and
//!   permission-token checks
//! - **Tenant service**: atomic tenant-with-admin provisioning, idempotent
//!   default-role seeding, settings merge
//! - **Password hashing**: the opaque hash/verify seam the user flows use
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_identity::{MemoryStore, NewTenant, NewUser};
//! use campus_services::{SaltedSha256Hasher, TenantService};
//!
//! let store = MemoryStore::new();
//! let hasher = SaltedSha256Hasher::new();
//! let tenants = TenantService::new(&store, &hasher);
//!
//! let (tenant, admin) = tenants
//!     .create_tenant_with_admin(
//!         NewTenant::new("Test Co", "testco"),
//!         NewUser::new("admin", "admin@testco.example", "adminpass123"),
//!     )
//!     .unwrap();
//! assert!(admin.is_staff);
//! # let _ = tenant;
//! ```

pub mod password;
pub mod role;
pub mod templates;
pub mod tenant;
pub mod user;

// Re-export main types for convenience
pub use password::{PasswordHasher, SaltedSha256Hasher};
pub use role::RoleService;
pub use templates::{RoleTemplate, DEFAULT_ROLE_TEMPLATES};
pub use tenant::{SeedReport, TenantService};
pub use user::UserService;
