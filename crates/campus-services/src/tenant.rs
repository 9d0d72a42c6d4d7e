//! Tenant provisioning service
//!
//! Tenant creation, atomic tenant-with-admin provisioning, idempotent
//! default-role seeding, and settings merge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use campus_identity::{
    validate_subdomain, IdentityError, IdentityResult, IdentityStore, NewTenant, NewUser, Role,
    RoleAssignment, RoleName, Tenant, User,
};

use crate::password::PasswordHasher;
use crate::templates::RoleTemplate;

/// Outcome of a role-seeding run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedReport {
    /// Roles created by this run
    pub created: Vec<RoleName>,

    /// Roles that already existed and were left untouched
    pub existing: Vec<RoleName>,
}

/// Tenant provisioning operations over an identity store.
pub struct TenantService<'a, S, H> {
    store: &'a S,
    hasher: &'a H,
}

impl<'a, S, H> TenantService<'a, S, H>
where
    S: IdentityStore,
    H: PasswordHasher,
{
    /// Create a tenant service.
    pub fn new(store: &'a S, hasher: &'a H) -> Self {
        Self { store, hasher }
    }

    /// Create a tenant after validating its subdomain.
    pub fn create_tenant(&self, input: NewTenant) -> IdentityResult<Tenant> {
        validate_subdomain(&input.subdomain)?;
        let tenant = Tenant::new(input.name, input.subdomain)
            .with_plan(input.plan)
            .with_settings(input.settings);
        self.store.insert_tenant(tenant)
    }

    /// Atomically create a tenant with its default roles and admin user.
    ///
    /// In one transaction: the tenant is created, its three default roles
    /// are seeded, the admin user is created with staff access, and the
    /// admin role is granted. Failure at any step rolls back the entire
    /// sequence, so an orphaned tenant with no admin never persists.
    ///
    /// # Arguments
    ///
    /// * `tenant_input` - The new tenant's fields
    /// * `admin_input` - The admin user's fields
    /// * `templates` - The role templates to seed
    ///
    /// # Returns
    ///
    /// The created tenant and its admin user
    pub fn create_tenant_with_admin(
        &self,
        tenant_input: NewTenant,
        admin_input: NewUser,
    ) -> IdentityResult<(Tenant, User)> {
        self.create_tenant_with_admin_from(tenant_input, admin_input, crate::DEFAULT_ROLE_TEMPLATES)
    }

    /// [`Self::create_tenant_with_admin`] with explicit role templates.
    pub fn create_tenant_with_admin_from(
        &self,
        tenant_input: NewTenant,
        admin_input: NewUser,
        templates: &[RoleTemplate],
    ) -> IdentityResult<(Tenant, User)> {
        validate_subdomain(&tenant_input.subdomain)?;
        if let Some(confirm) = &admin_input.password_confirm {
            if confirm != &admin_input.password {
                return Err(IdentityError::Validation {
                    field: "password_confirm",
                    message: "Password fields didn't match".to_string(),
                });
            }
        }

        let tenant = Tenant::new(tenant_input.name, tenant_input.subdomain)
            .with_plan(tenant_input.plan)
            .with_settings(tenant_input.settings);

        let mut admin = User::new(tenant.id, admin_input.username, admin_input.email)
            .with_name(admin_input.first_name, admin_input.last_name)
            .with_staff(true);
        admin.phone_number = admin_input.phone_number;
        if let Some(timezone) = admin_input.timezone {
            admin.timezone = timezone;
        }
        if let Some(language) = admin_input.language {
            admin.language = language;
        }
        admin.password_hash = self.hasher.hash(&admin_input.password);

        let result = self.store.transaction(move |store| {
            let tenant = store.insert_tenant(tenant)?;
            Self::seed_into(store, tenant.id, templates)?;

            let admin = store.insert_user(admin)?;
            let admin_role = store
                .role_by_name(tenant.id, RoleName::Admin)?
                .ok_or(IdentityError::RoleNotFound)?;
            store.insert_assignment(RoleAssignment::new(admin.id, admin_role.id, tenant.id))?;

            Ok((tenant, admin))
        })?;

        info!(subdomain = %result.0.subdomain, admin = %result.1.username, "tenant provisioned");
        Ok(result)
    }

    /// Seed a tenant's default roles from templates.
    ///
    /// Idempotent per tenant: a role that already exists is left untouched
    /// (custom permission edits survive) and reported as existing.
    pub fn seed_default_roles(
        &self,
        tenant_id: Uuid,
        templates: &[RoleTemplate],
    ) -> IdentityResult<SeedReport> {
        self.store
            .transaction(|store| Self::seed_into(store, tenant_id, templates))
    }

    fn seed_into(
        store: &S,
        tenant_id: Uuid,
        templates: &[RoleTemplate],
    ) -> IdentityResult<SeedReport> {
        let mut report = SeedReport::default();
        for template in templates {
            if store.role_by_name(tenant_id, template.name)?.is_some() {
                report.existing.push(template.name);
                continue;
            }
            store.insert_role(
                Role::new(tenant_id, template.name)
                    .with_description(template.description)
                    .with_permissions(template.permissions.iter().copied()),
            )?;
            report.created.push(template.name);
        }
        Ok(report)
    }

    /// Merge a partial settings map into a tenant's settings.
    ///
    /// Shallow merge: new keys overwrite, untouched keys persist.
    pub fn update_tenant_settings(
        &self,
        tenant_id: Uuid,
        patch: HashMap<String, serde_json::Value>,
    ) -> IdentityResult<Tenant> {
        let mut tenant = self
            .store
            .tenant_by_id(tenant_id)?
            .ok_or(IdentityError::TenantNotFound)?;
        tenant.merge_settings(patch);
        self.store.update_tenant(tenant)
    }

    /// Soft-disable a tenant by clearing its active flag.
    pub fn deactivate_tenant(&self, tenant_id: Uuid) -> IdentityResult<Tenant> {
        self.set_active(tenant_id, false)
    }

    /// Re-enable a soft-disabled tenant.
    pub fn activate_tenant(&self, tenant_id: Uuid) -> IdentityResult<Tenant> {
        self.set_active(tenant_id, true)
    }

    fn set_active(&self, tenant_id: Uuid, is_active: bool) -> IdentityResult<Tenant> {
        let mut tenant = self
            .store
            .tenant_by_id(tenant_id)?
            .ok_or(IdentityError::TenantNotFound)?;
        tenant.is_active = is_active;
        tenant.updated_at = chrono::Utc::now();
        self.store.update_tenant(tenant)
    }
}
