//! In-memory identity store
//!
//! A thread-safe, transactional store used for tests and embedded
//! deployments. Enforces the same constraints a relational backend would:
//! uniqueness, tenant-consistency on assignment writes, and the cascade
//! rules for deletions.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use uuid::Uuid;

use crate::assignment::RoleAssignment;
use crate::error::{IdentityError, IdentityResult};
use crate::role::{Role, RoleName};
use crate::store::IdentityStore;
use crate::tenant::Tenant;
use crate::user::User;

#[derive(Debug, Clone, Default)]
struct State {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    assignments: HashMap<Uuid, RoleAssignment>,
}

/// Thread-safe in-memory implementation of [`IdentityStore`].
///
/// Transactions take a snapshot of the full state and restore it if the
/// closure fails, so multi-row writes are all-or-nothing. A transaction
/// excludes every other operation for its duration: other threads block
/// until it commits or rolls back, so a committed write can never land
/// between a transaction's snapshot and its restore and be erased by the
/// rollback. Transactions do not nest.
///
/// # Examples
///
/// ```
/// use campus_identity::{IdentityStore, MemoryStore, Tenant};
///
/// let store = MemoryStore::new();
/// let tenant = store.insert_tenant(Tenant::new("Test Co", "test-co")).unwrap();
/// assert!(store.tenant_by_subdomain("test-co").unwrap().is_some());
/// assert_eq!(store.tenant_by_id(tenant.id).unwrap().unwrap().name, "Test Co");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    txn: Mutex<()>,
    txn_owner: Mutex<Option<ThreadId>>,
}

/// State access for one operation.
///
/// Operations running outside a transaction additionally hold the
/// transaction lock, so they are ordered entirely before or after any
/// in-flight transaction.
struct StateGuard<'a> {
    _serialized: Option<MutexGuard<'a, ()>>,
    state: MutexGuard<'a, State>,
}

impl Deref for StateGuard<'_> {
    type Target = State;

    fn deref(&self) -> &State {
        &self.state
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned(_: impl Sized) -> IdentityError {
        IdentityError::Store("store lock poisoned".to_string())
    }

    /// Lock the state for one operation.
    ///
    /// Operations issued by a transaction closure (same thread as the
    /// transaction owner) go straight to the state; everything else waits
    /// for any in-flight transaction to finish first.
    fn state(&self) -> IdentityResult<StateGuard<'_>> {
        let inside_txn =
            *self.txn_owner.lock().map_err(Self::lock_poisoned)? == Some(thread::current().id());
        let serialized = if inside_txn {
            None
        } else {
            Some(self.txn.lock().map_err(Self::lock_poisoned)?)
        };
        let state = self.state.lock().map_err(Self::lock_poisoned)?;
        Ok(StateGuard {
            _serialized: serialized,
            state,
        })
    }

    fn check_tenant_exists(state: &State, tenant_id: Uuid) -> IdentityResult<()> {
        if state.tenants.contains_key(&tenant_id) {
            Ok(())
        } else {
            Err(IdentityError::TenantNotFound)
        }
    }

    /// Per-tenant username/email uniqueness, optionally excluding one user
    /// (for updates).
    fn check_user_unique(state: &State, user: &User, exclude: Option<Uuid>) -> IdentityResult<()> {
        for other in state.users.values() {
            if Some(other.id) == exclude || other.tenant_id != user.tenant_id {
                continue;
            }
            if other.username == user.username {
                return Err(IdentityError::DuplicateUsername(user.username.clone()));
            }
            if other.email == user.email {
                return Err(IdentityError::DuplicateEmail(user.email.clone()));
            }
        }
        Ok(())
    }
}

impl IdentityStore for MemoryStore {
    // -- Tenants ----------------------------------------------------------

    fn insert_tenant(&self, tenant: Tenant) -> IdentityResult<Tenant> {
        let mut state = self.state()?;
        if state
            .tenants
            .values()
            .any(|t| t.subdomain == tenant.subdomain)
        {
            return Err(IdentityError::DuplicateSubdomain(tenant.subdomain));
        }
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    fn tenant_by_id(&self, id: Uuid) -> IdentityResult<Option<Tenant>> {
        Ok(self.state()?.tenants.get(&id).cloned())
    }

    fn tenant_by_subdomain(&self, subdomain: &str) -> IdentityResult<Option<Tenant>> {
        Ok(self
            .state()?
            .tenants
            .values()
            .find(|t| t.subdomain == subdomain)
            .cloned())
    }

    fn update_tenant(&self, tenant: Tenant) -> IdentityResult<Tenant> {
        let mut state = self.state()?;
        if !state.tenants.contains_key(&tenant.id) {
            return Err(IdentityError::TenantNotFound);
        }
        if state
            .tenants
            .values()
            .any(|t| t.id != tenant.id && t.subdomain == tenant.subdomain)
        {
            return Err(IdentityError::DuplicateSubdomain(tenant.subdomain));
        }
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    fn list_tenants(&self) -> IdentityResult<Vec<Tenant>> {
        let mut tenants: Vec<Tenant> = self.state()?.tenants.values().cloned().collect();
        tenants.sort_by_key(|t| t.created_at);
        Ok(tenants)
    }

    fn delete_tenant(&self, id: Uuid) -> IdentityResult<()> {
        let mut state = self.state()?;
        if state.tenants.remove(&id).is_none() {
            return Err(IdentityError::TenantNotFound);
        }
        state.users.retain(|_, u| u.tenant_id != id);
        state.roles.retain(|_, r| r.tenant_id != id);
        state.assignments.retain(|_, a| a.tenant_id != id);
        Ok(())
    }

    // -- Users ------------------------------------------------------------

    fn insert_user(&self, user: User) -> IdentityResult<User> {
        let mut state = self.state()?;
        Self::check_tenant_exists(&state, user.tenant_id)?;
        Self::check_user_unique(&state, &user, None)?;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn user_by_id(&self, id: Uuid) -> IdentityResult<Option<User>> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    fn user_by_username(&self, tenant_id: Uuid, username: &str) -> IdentityResult<Option<User>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.tenant_id == tenant_id && u.username == username)
            .cloned())
    }

    fn user_by_email(&self, tenant_id: Uuid, email: &str) -> IdentityResult<Option<User>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.tenant_id == tenant_id && u.email == email)
            .cloned())
    }

    fn update_user(&self, user: User) -> IdentityResult<User> {
        let mut state = self.state()?;
        if !state.users.contains_key(&user.id) {
            return Err(IdentityError::UserNotFound);
        }
        Self::check_user_unique(&state, &user, Some(user.id))?;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn list_users(&self, tenant_id: Uuid) -> IdentityResult<Vec<User>> {
        let mut users: Vec<User> = self
            .state()?
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    fn delete_user(&self, id: Uuid) -> IdentityResult<()> {
        let mut state = self.state()?;
        if state.users.remove(&id).is_none() {
            return Err(IdentityError::UserNotFound);
        }
        // Assignments held by the user cascade; assignments they granted
        // keep the grant but lose the assigner reference.
        state.assignments.retain(|_, a| a.user_id != id);
        for assignment in state.assignments.values_mut() {
            if assignment.assigned_by == Some(id) {
                assignment.assigned_by = None;
            }
        }
        Ok(())
    }

    // -- Roles ------------------------------------------------------------

    fn insert_role(&self, role: Role) -> IdentityResult<Role> {
        let mut state = self.state()?;
        Self::check_tenant_exists(&state, role.tenant_id)?;
        if state
            .roles
            .values()
            .any(|r| r.tenant_id == role.tenant_id && r.name == role.name)
        {
            return Err(IdentityError::DuplicateRole(role.name.as_str().to_string()));
        }
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    fn role_by_id(&self, id: Uuid) -> IdentityResult<Option<Role>> {
        Ok(self.state()?.roles.get(&id).cloned())
    }

    fn role_by_name(&self, tenant_id: Uuid, name: RoleName) -> IdentityResult<Option<Role>> {
        Ok(self
            .state()?
            .roles
            .values()
            .find(|r| r.tenant_id == tenant_id && r.name == name)
            .cloned())
    }

    fn update_role(&self, role: Role) -> IdentityResult<Role> {
        let mut state = self.state()?;
        if !state.roles.contains_key(&role.id) {
            return Err(IdentityError::RoleNotFound);
        }
        if state
            .roles
            .values()
            .any(|r| r.id != role.id && r.tenant_id == role.tenant_id && r.name == role.name)
        {
            return Err(IdentityError::DuplicateRole(role.name.as_str().to_string()));
        }
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    fn list_roles(&self, tenant_id: Uuid) -> IdentityResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .state()?
            .roles
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        roles.sort_by_key(|r| r.created_at);
        Ok(roles)
    }

    fn delete_role(&self, id: Uuid) -> IdentityResult<()> {
        let mut state = self.state()?;
        if state.roles.remove(&id).is_none() {
            return Err(IdentityError::RoleNotFound);
        }
        state.assignments.retain(|_, a| a.role_id != id);
        Ok(())
    }

    // -- Role assignments -------------------------------------------------

    fn insert_assignment(&self, assignment: RoleAssignment) -> IdentityResult<RoleAssignment> {
        let mut state = self.state()?;

        let user = state
            .users
            .get(&assignment.user_id)
            .ok_or(IdentityError::UserNotFound)?;
        if user.tenant_id != assignment.tenant_id {
            return Err(IdentityError::TenantMismatch { party: "User" });
        }

        let role = state
            .roles
            .get(&assignment.role_id)
            .ok_or(IdentityError::RoleNotFound)?;
        if role.tenant_id != assignment.tenant_id {
            return Err(IdentityError::TenantMismatch { party: "Role" });
        }

        if let Some(assigner_id) = assignment.assigned_by {
            let assigner = state
                .users
                .get(&assigner_id)
                .ok_or(IdentityError::UserNotFound)?;
            if assigner.tenant_id != assignment.tenant_id {
                return Err(IdentityError::TenantMismatch { party: "Assigner" });
            }
        }

        if state.assignments.values().any(|a| {
            a.user_id == assignment.user_id
                && a.role_id == assignment.role_id
                && a.tenant_id == assignment.tenant_id
        }) {
            return Err(IdentityError::DuplicateAssignment);
        }

        state.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    fn assignment_for(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Option<RoleAssignment>> {
        Ok(self
            .state()?
            .assignments
            .values()
            .find(|a| a.user_id == user_id && a.role_id == role_id && a.tenant_id == tenant_id)
            .cloned())
    }

    fn assignments_for_user(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Vec<RoleAssignment>> {
        let mut assignments: Vec<RoleAssignment> = self
            .state()?
            .assignments
            .values()
            .filter(|a| a.user_id == user_id && a.tenant_id == tenant_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.created_at);
        Ok(assignments)
    }

    fn assignments_for_role(
        &self,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<Vec<RoleAssignment>> {
        let mut assignments: Vec<RoleAssignment> = self
            .state()?
            .assignments
            .values()
            .filter(|a| a.role_id == role_id && a.tenant_id == tenant_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.created_at);
        Ok(assignments)
    }

    fn delete_assignment(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        tenant_id: Uuid,
    ) -> IdentityResult<u64> {
        let mut state = self.state()?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|_, a| !(a.user_id == user_id && a.role_id == role_id && a.tenant_id == tenant_id));
        Ok((before - state.assignments.len()) as u64)
    }

    fn roles_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> IdentityResult<Vec<Role>> {
        let state = self.state()?;
        let mut roles: Vec<Role> = state
            .assignments
            .values()
            .filter(|a| a.user_id == user_id && a.tenant_id == tenant_id)
            .filter_map(|a| state.roles.get(&a.role_id).cloned())
            .collect();
        roles.sort_by_key(|r| r.created_at);
        Ok(roles)
    }

    // -- Transactions -----------------------------------------------------

    fn transaction<T, F>(&self, f: F) -> IdentityResult<T>
    where
        F: FnOnce(&Self) -> IdentityResult<T>,
    {
        // Held until commit or rollback completes; operations outside the
        // transaction queue behind it in `state()`.
        let _serialized = self
            .txn
            .lock()
            .map_err(|_| IdentityError::Store("transaction lock poisoned".to_string()))?;
        let snapshot = self.state.lock().map_err(Self::lock_poisoned)?.clone();

        *self.txn_owner.lock().map_err(Self::lock_poisoned)? = Some(thread::current().id());
        let result = f(self);
        *self.txn_owner.lock().map_err(Self::lock_poisoned)? = None;

        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                *self.state.lock().map_err(Self::lock_poisoned)? = snapshot;
                Err(err)
            }
        }
    }
}
