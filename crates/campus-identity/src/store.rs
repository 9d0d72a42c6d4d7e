//! Store trait for identity data access
//!
//! All operations are synchronous, blocking calls; requests are served by a
//! pool of workers handling one request each, so no async seams are needed.
//! Tenant-scoped lookups take a `tenant_id` parameter to enforce isolation.

use uuid::Uuid;

use crate::assignment::RoleAssignment;
use crate::error::IdentityResult;
use crate::role::{Role, RoleName};
use crate::tenant::Tenant;
use crate::user::User;

/// Persistence interface for tenants, users, roles, and role assignments.
///
/// Implementations must enforce the uniqueness constraints (global tenant
/// subdomain; per-tenant username, email, and role name; the
/// (user, role, tenant) assignment triple) and the tenant-consistency
/// invariant on assignment insertion. The store is the authoritative guard
/// against duplicate assignments; service-level existence checks are an
/// optimization, not the sole defense.
///
/// Multi-row write sequences run inside [`IdentityStore::transaction`] so a
/// concurrent reader never observes a half-created tenant/admin/assignment
/// group.
pub trait IdentityStore: Send + Sync {
    // -- Tenants ----------------------------------------------------------

    /// Insert a tenant, enforcing global subdomain uniqueness.
    fn insert_tenant(&self, tenant: Tenant) -> IdentityResult<Tenant>;

    /// Look up a tenant by id, regardless of its active flag.
    fn tenant_by_id(&self, id: Uuid) -> IdentityResult<Option<Tenant>>;

    /// Look up a tenant by subdomain, regardless of its active flag.
    fn tenant_by_subdomain(&self, subdomain: &str) -> IdentityResult<Option<Tenant>>;

    /// Replace a stored tenant, re-checking subdomain uniqueness.
    fn update_tenant(&self, tenant: Tenant) -> IdentityResult<Tenant>;

    /// List all tenants.
    fn list_tenants(&self) -> IdentityResult<Vec<Tenant>>;

    /// Delete a tenant, cascading to its users, roles, and assignments.
    fn delete_tenant(&self, id: Uuid) -> IdentityResult<()>;

    // -- Users ------------------------------------------------------------

    /// Insert a user, enforcing per-tenant username and email uniqueness.
    fn insert_user(&self, user: User) -> IdentityResult<User>;

    /// Look up a user by id.
    fn user_by_id(&self, id: Uuid) -> IdentityResult<Option<User>>;

    /// Look up a user by username within a tenant.
    fn user_by_username(&self, tenant_id: Uuid, username: &str) -> IdentityResult<Option<User>>;

    /// Look up a user by email within a tenant.
    fn user_by_email(&self, tenant_id: Uuid, email: &str) -> IdentityResult<Option<User>>;

    /// Replace a stored user, re-checking per-tenant uniqueness.
    fn update_user(&self, user: User) -> IdentityResult<User>;

    /// List all users belonging to a tenant.
    fn list_users(&self, tenant_id: Uuid) -> IdentityResult<Vec<User>>;

    /// Delete a user, cascading to their assignments and nulling
    /// `assigned_by` on assignments they granted.
    fn delete_user(&self, id: Uuid) -> IdentityResult<()>;

    // -- Roles ------------------------------------------------------------

    /// Insert a role, enforcing per-tenant name uniqueness.
    fn insert_role(&self, role: Role) -> IdentityResult<Role>;

    /// Look up a role by id.
    fn role_by_id(&self, id: Uuid) -> IdentityResult<Option<Role>>;

    /// Look up a role by name within a tenant.
    fn role_by_name(&self, tenant_id: Uuid, name: RoleName) -> IdentityResult<Option<Role>>;

    /// Replace a stored role.
    fn update_role(&self, role: Role) -> IdentityResult<Role>;

    /// List all roles belonging to a tenant.
    fn list_roles(&self, tenant_id: Uuid) -> IdentityResult<Vec<Role>>;

    /// Delete a role, cascading to its assignments.
    fn delete_role(&self, id: Uuid) -> IdentityResult<()>;

    // -- Role assignments -------------------------------------------------

    /// Insert an assignment.
    ///
    /// Enforces the (user, role, tenant) uniqueness constraint and the
    /// tenant-consistency invariant: the user, role, and (when present)
    /// assigner must all belong to the assignment's tenant. A violation
    /// fails the write; the mismatched reference is never silently dropped.
    fn insert_assignment(&self, assignment: RoleAssignment) -> IdentityResult<RoleAssignment>;

    /// Look up the assignment for a (user, role, tenant) triple.
    fn assignment_for(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Option<RoleAssignment>>;

    /// List all assignments held by a user in a tenant.
    fn assignments_for_user(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Vec<RoleAssignment>>;

    /// List all assignments of a role in a tenant.
    fn assignments_for_role(
        &self,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Vec<RoleAssignment>>;

    /// Delete the assignment matching a (user, role, tenant) triple.
    ///
    /// # Returns
    ///
    /// The number of rows removed (zero or one); zero is not an error.
    fn delete_assignment(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<u64>;

    /// Resolve the roles a user holds in a tenant.
    fn roles_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> IdentityResult<Vec<Role>>;

    /// Check whether a user holds any of the named roles in a tenant.
    fn user_has_role(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        names: &[RoleName],
    ) -> IdentityResult<bool> {
        Ok(self
            .roles_for_user(user_id, tenant_id)?
            .iter()
            .any(|role| names.contains(&role.name)))
    }

    // -- Transactions -----------------------------------------------------

    /// Run a multi-row write sequence atomically.
    ///
    /// If the closure returns an error, every write it performed is rolled
    /// back. Transactions do not nest.
    fn transaction<T, F>(&self, f: F) -> IdentityResult<T>
    where
        F: FnOnce(&Self) -> IdentityResult<T>,
        Self: Sized;
}
