//! End-to-end tests for the lifecycle services.
//!
//! These tests run the provisioning, registration, and role-assignment
//! workflows against a populated in-memory store and verify the
//! cross-entity invariants: per-tenant uniqueness, tenant consistency on
//! grants, idempotent assignment and seeding, and transactional rollback.

use campus_identity::{
    IdentityError, IdentityStore, MemoryStore, NewTenant, NewUser, RoleName,
};
use campus_services::{
    PasswordHasher, RoleService, SaltedSha256Hasher, TenantService, UserService,
    DEFAULT_ROLE_TEMPLATES,
};

struct TestFixture {
    store: MemoryStore,
    hasher: SaltedSha256Hasher,
}

impl TestFixture {
    fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            hasher: SaltedSha256Hasher::new(),
        }
    }

    fn tenants(&self) -> TenantService<'_, MemoryStore, SaltedSha256Hasher> {
        TenantService::new(&self.store, &self.hasher)
    }

    fn users(&self) -> UserService<'_, MemoryStore, SaltedSha256Hasher> {
        UserService::new(&self.store, &self.hasher)
    }

    fn roles(&self) -> RoleService<'_, MemoryStore> {
        RoleService::new(&self.store)
    }
}

#[test]
fn test_register_tenant_with_admin_end_to_end() {
    let f = TestFixture::new();

    let (tenant, admin) = f
        .tenants()
        .create_tenant_with_admin(
            NewTenant::new("Test Co", "testco"),
            NewUser::new("admin", "admin@testco.example", "adminpass123"),
        )
        .unwrap();

    // Tenant created active.
    assert!(tenant.is_active);
    assert_eq!(tenant.subdomain, "testco");

    // Admin created with staff access and a verifiable password.
    assert!(admin.is_staff);
    assert!(f.hasher.verify("adminpass123", &admin.password_hash));

    // Admin holds the admin role with the full default permission set.
    let roles = f.store.roles_for_user(admin.id, tenant.id).unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, RoleName::Admin);
    for token in [
        "manage_users",
        "manage_roles",
        "manage_courses",
        "manage_assessments",
        "view_analytics",
        "manage_settings",
    ] {
        assert!(roles[0].has_permission(token), "admin missing {token}");
    }

    // All three default roles were seeded.
    assert_eq!(f.store.list_roles(tenant.id).unwrap().len(), 3);
}

#[test]
fn test_same_username_in_two_tenants_but_not_one() {
    let f = TestFixture::new();
    let t1 = f.tenants().create_tenant(NewTenant::new("One", "one")).unwrap();
    let t2 = f.tenants().create_tenant(NewTenant::new("Two", "two")).unwrap();

    f.users()
        .create_user(NewUser::new("x", "x@one.example", "pw123456"), &t1, false)
        .unwrap();
    f.users()
        .create_user(NewUser::new("x", "x@two.example", "pw123456"), &t2, false)
        .unwrap();

    let result = f
        .users()
        .create_user(NewUser::new("x", "x2@one.example", "pw123456"), &t1, false);
    assert!(matches!(result, Err(IdentityError::DuplicateUsername(_))));
}

#[test]
fn test_cross_tenant_assignment_creates_no_row() {
    let f = TestFixture::new();
    let (t1, _) = f
        .tenants()
        .create_tenant_with_admin(
            NewTenant::new("One", "one"),
            NewUser::new("admin", "admin@one.example", "adminpass123"),
        )
        .unwrap();
    let t2 = f.tenants().create_tenant(NewTenant::new("Two", "two")).unwrap();
    let outsider = f
        .users()
        .create_user(NewUser::new("bob", "bob@two.example", "pw123456"), &t2, false)
        .unwrap();

    let role = f
        .store
        .role_by_name(t1.id, RoleName::Student)
        .unwrap()
        .unwrap();
    let result = f.roles().assign_role(outsider.id, role.id, t1.id, None);

    assert!(matches!(result, Err(IdentityError::TenantMismatch { party: "User" })));
    assert!(f
        .store
        .assignment_for(outsider.id, role.id, t1.id)
        .unwrap()
        .is_none());
}

#[test]
fn test_double_assignment_yields_one_row_same_id() {
    let f = TestFixture::new();
    let (tenant, admin) = f
        .tenants()
        .create_tenant_with_admin(
            NewTenant::new("Test Co", "testco"),
            NewUser::new("admin", "admin@testco.example", "adminpass123"),
        )
        .unwrap();
    let user = f
        .users()
        .create_user(NewUser::new("alice", "alice@testco.example", "pw123456"), &tenant, false)
        .unwrap();
    let role = f
        .store
        .role_by_name(tenant.id, RoleName::Instructor)
        .unwrap()
        .unwrap();

    let first = f
        .roles()
        .assign_role(user.id, role.id, tenant.id, Some(admin.id))
        .unwrap();
    let second = f
        .roles()
        .assign_role(user.id, role.id, tenant.id, Some(admin.id))
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(
        f.store.assignments_for_user(user.id, tenant.id).unwrap().len(),
        1
    );
}

#[test]
fn test_double_seeding_preserves_customizations() {
    let f = TestFixture::new();
    let tenant = f
        .tenants()
        .create_tenant(NewTenant::new("Test Co", "testco"))
        .unwrap();

    f.tenants()
        .seed_default_roles(tenant.id, DEFAULT_ROLE_TEMPLATES)
        .unwrap();

    let mut admin_role = f
        .store
        .role_by_name(tenant.id, RoleName::Admin)
        .unwrap()
        .unwrap();
    admin_role.remove_permission("manage_settings");
    f.store.update_role(admin_role).unwrap();

    let report = f
        .tenants()
        .seed_default_roles(tenant.id, DEFAULT_ROLE_TEMPLATES)
        .unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.existing.len(), 3);
    assert_eq!(f.store.list_roles(tenant.id).unwrap().len(), 3);

    let admin_role = f
        .store
        .role_by_name(tenant.id, RoleName::Admin)
        .unwrap()
        .unwrap();
    assert!(!admin_role.has_permission("manage_settings"));
}

#[test]
fn test_registration_grants_student_role() {
    let f = TestFixture::new();
    let (tenant, _) = f
        .tenants()
        .create_tenant_with_admin(
            NewTenant::new("Test Co", "testco"),
            NewUser::new("admin", "admin@testco.example", "adminpass123"),
        )
        .unwrap();

    let student = f
        .users()
        .create_user(
            NewUser::new("alice", "alice@testco.example", "pw123456")
                .with_confirmation("pw123456"),
            &tenant,
            true,
        )
        .unwrap();

    assert!(f
        .roles()
        .has_permission(student.id, "enroll_courses", tenant.id)
        .unwrap());
    assert!(!f
        .roles()
        .has_permission(student.id, "manage_users", tenant.id)
        .unwrap());
}

#[test]
fn test_change_password_with_wrong_old_leaves_hash() {
    let f = TestFixture::new();
    let tenant = f
        .tenants()
        .create_tenant(NewTenant::new("Test Co", "testco"))
        .unwrap();
    let user = f
        .users()
        .create_user(NewUser::new("alice", "alice@testco.example", "pw123456"), &tenant, false)
        .unwrap();

    let result = f.users().change_password(user.id, "wrong", "newpass123");
    assert!(matches!(result, Err(IdentityError::IncorrectPassword)));

    let stored = f.store.user_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[test]
fn test_duplicate_subdomain_rejected_across_provisioning() {
    let f = TestFixture::new();
    f.tenants()
        .create_tenant(NewTenant::new("First", "testco"))
        .unwrap();

    let result = f.tenants().create_tenant_with_admin(
        NewTenant::new("Second", "testco"),
        NewUser::new("admin", "admin@second.example", "adminpass123"),
    );

    assert!(matches!(result, Err(IdentityError::DuplicateSubdomain(_))));
    // The failed run left no admin user behind in any tenant.
    let survivor = f.store.tenant_by_subdomain("testco").unwrap().unwrap();
    assert_eq!(survivor.name, "First");
    assert!(f.store.list_users(survivor.id).unwrap().is_empty());
}
