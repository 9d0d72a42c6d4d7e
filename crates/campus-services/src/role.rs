//! Role assignment service
//!
//! Idempotent role grants, removals, and permission-token checks. The
//! tenant-consistency invariant is enforced by the store on insert; this
//! service translates the duplicate-row rejection into the idempotent
//! return of the existing assignment.

use tracing::info;
use uuid::Uuid;

use campus_identity::{
    IdentityError, IdentityResult, IdentityStore, Role, RoleAssignment, User,
};

/// Role assignment operations over an identity store.
pub struct RoleService<'a, S> {
    store: &'a S,
}

impl<'a, S: IdentityStore> RoleService<'a, S> {
    /// Create a role service.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Grant a role to a user within a tenant.
    ///
    /// Idempotent: if the (user, role, tenant) triple already exists, the
    /// existing assignment is returned unchanged. The store's uniqueness
    /// constraint is the authoritative guard; losing the race to a
    /// concurrent identical grant is treated the same as finding the row
    /// up front.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user receiving the role
    /// * `role_id` - The role being granted
    /// * `tenant_id` - The tenant scope of the grant
    /// * `assigned_by` - Who granted the role, if known
    ///
    /// # Returns
    ///
    /// The (new or pre-existing) assignment, or a tenant-consistency error
    /// naming the mismatched party
    pub fn assign_role(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        tenant_id: Uuid,
        assigned_by: Option<Uuid>,
    ) -> IdentityResult<RoleAssignment> {
        if let Some(existing) = self.store.assignment_for(user_id, role_id, tenant_id)? {
            return Ok(existing);
        }

        let mut assignment = RoleAssignment::new(user_id, role_id, tenant_id);
        if let Some(assigner) = assigned_by {
            assignment = assignment.with_assigner(assigner);
        }

        match self.store.insert_assignment(assignment) {
            Ok(created) => {
                info!(user_id = %user_id, role_id = %role_id, tenant_id = %tenant_id, "role assigned");
                Ok(created)
            }
            Err(IdentityError::DuplicateAssignment) => self
                .store
                .assignment_for(user_id, role_id, tenant_id)?
                .ok_or(IdentityError::DuplicateAssignment),
            Err(err) => Err(err),
        }
    }

    /// Remove a role from a user.
    ///
    /// # Returns
    ///
    /// The number of assignments removed (zero or one); zero is not an
    /// error.
    pub fn remove_role(&self, user_id: Uuid, role_id: Uuid, tenant_id: Uuid) -> IdentityResult<u64> {
        self.store.delete_assignment(user_id, role_id, tenant_id)
    }

    /// The roles a user holds in a tenant.
    pub fn roles_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> IdentityResult<Vec<Role>> {
        self.store.roles_for_user(user_id, tenant_id)
    }

    /// The users holding a role in a tenant.
    pub fn users_with_role(&self, role_id: Uuid, tenant_id: Uuid) -> IdentityResult<Vec<User>> {
        let assignments = self.store.assignments_for_role(role_id, tenant_id)?;
        let mut users = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if let Some(user) = self.store.user_by_id(assignment.user_id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    /// Check whether any of a user's roles grants a permission token.
    ///
    /// Linear scan of the user's role permission sets; acceptable at
    /// expected tenant/role-count scale.
    pub fn has_permission(
        &self,
        user_id: Uuid,
        token: &str,
        tenant_id: Uuid,
    ) -> IdentityResult<bool> {
        Ok(self
            .store
            .roles_for_user(user_id, tenant_id)?
            .iter()
            .any(|role| role.has_permission(token)))
    }
}
