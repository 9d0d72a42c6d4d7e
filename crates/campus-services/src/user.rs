//! User lifecycle service
//!
//! Registration, field-level updates, soft delete, and verified password
//! changes. Passwords never reach the store in plaintext; hashing goes
//! through the [`PasswordHasher`](crate::PasswordHasher) seam.

use tracing::info;
use uuid::Uuid;

use campus_identity::{
    IdentityError, IdentityResult, IdentityStore, NewUser, RoleAssignment, RoleName, Tenant, User,
    UserPatch,
};

use crate::password::PasswordHasher;

/// User lifecycle operations over an identity store.
pub struct UserService<'a, S, H> {
    store: &'a S,
    hasher: &'a H,
}

impl<'a, S, H> UserService<'a, S, H>
where
    S: IdentityStore,
    H: PasswordHasher,
{
    /// Create a user service.
    pub fn new(store: &'a S, hasher: &'a H) -> Self {
        Self { store, hasher }
    }

    /// Create a user under a tenant.
    ///
    /// Runs in one atomic transaction: a partially-created user with no
    /// role state never persists on failure. When `assign_default_role` is
    /// set, the tenant's student role is granted; a tenant with no student
    /// role yet is silently skipped.
    ///
    /// # Arguments
    ///
    /// * `input` - The new user's fields, including the plaintext password
    /// * `tenant` - The tenant the user belongs to
    /// * `assign_default_role` - Whether to grant the student role
    ///
    /// # Returns
    ///
    /// The created user, or a validation/duplicate error
    pub fn create_user(
        &self,
        input: NewUser,
        tenant: &Tenant,
        assign_default_role: bool,
    ) -> IdentityResult<User> {
        if let Some(confirm) = &input.password_confirm {
            if confirm != &input.password {
                return Err(IdentityError::Validation {
                    field: "password_confirm",
                    message: "Password fields didn't match".to_string(),
                });
            }
        }

        let mut user = User::new(tenant.id, input.username, input.email)
            .with_name(input.first_name, input.last_name);
        user.phone_number = input.phone_number;
        if let Some(timezone) = input.timezone {
            user.timezone = timezone;
        }
        if let Some(language) = input.language {
            user.language = language;
        }
        user.password_hash = self.hasher.hash(&input.password);

        let tenant_id = tenant.id;
        let user = self.store.transaction(move |store| {
            let user = store.insert_user(user)?;
            if assign_default_role {
                Self::grant_student_role(store, &user, tenant_id)?;
            }
            Ok(user)
        })?;

        info!(username = %user.username, tenant_id = %tenant_id, "user created");
        Ok(user)
    }

    fn grant_student_role(store: &S, user: &User, tenant_id: Uuid) -> IdentityResult<()> {
        let Some(role) = store.role_by_name(tenant_id, RoleName::Student)? else {
            // Tenant not yet seeded; registration still succeeds.
            return Ok(());
        };
        store.insert_assignment(RoleAssignment::new(user.id, role.id, tenant_id))?;
        Ok(())
    }

    /// Apply a field-level patch to a user.
    ///
    /// The patch type cannot express tenant or password changes; those go
    /// through dedicated flows only.
    pub fn update_user(&self, user_id: Uuid, patch: &UserPatch) -> IdentityResult<User> {
        let mut user = self
            .store
            .user_by_id(user_id)?
            .ok_or(IdentityError::UserNotFound)?;
        patch.apply(&mut user);
        self.store.update_user(user)
    }

    /// Soft-delete a user by clearing the active flag.
    pub fn deactivate_user(&self, user_id: Uuid) -> IdentityResult<User> {
        self.set_active(user_id, false)
    }

    /// Restore a soft-deleted user.
    pub fn activate_user(&self, user_id: Uuid) -> IdentityResult<User> {
        self.set_active(user_id, true)
    }

    fn set_active(&self, user_id: Uuid, is_active: bool) -> IdentityResult<User> {
        let mut user = self
            .store
            .user_by_id(user_id)?
            .ok_or(IdentityError::UserNotFound)?;
        user.is_active = is_active;
        user.updated_at = chrono::Utc::now();
        self.store.update_user(user)
    }

    /// Change a user's password after verifying the old one.
    ///
    /// # Returns
    ///
    /// The updated user, or [`IdentityError::IncorrectPassword`] when the
    /// old password does not match the stored hash (hash unchanged).
    pub fn change_password(&self, user_id: Uuid, old: &str, new: &str) -> IdentityResult<User> {
        let mut user = self
            .store
            .user_by_id(user_id)?
            .ok_or(IdentityError::UserNotFound)?;
        if !self.hasher.verify(old, &user.password_hash) {
            return Err(IdentityError::IncorrectPassword);
        }
        user.password_hash = self.hasher.hash(new);
        user.updated_at = chrono::Utc::now();
        self.store.update_user(user)
    }

    /// List the users belonging to a tenant.
    pub fn users_in_tenant(&self, tenant_id: Uuid) -> IdentityResult<Vec<User>> {
        self.store.list_users(tenant_id)
    }
}
