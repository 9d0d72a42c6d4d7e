//! # Predicates
//!
//! Stateless access-control predicates evaluated against an access request
//! and the identity store. Each predicate queries the store directly; none
//! caches results across requests, so role membership always reflects the
//! latest grant.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_identity::{IdentityResult, IdentityStore, RoleName, Tenant, User};

use crate::request::RequestMethod;

/// An entity with a single owning user.
///
/// Entities that protect themselves with [`Predicate::OwnerOrAdmin`] expose
/// their owner through this trait. An entity that has no separate owner
/// field and is itself the protected account returns its own id.
pub trait Owned {
    /// The id of the user who owns this entity.
    fn owner_id(&self) -> Uuid;
}

impl Owned for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

/// The actor/tenant/method/target tuple a predicate inspects.
///
/// `actor` is `None` for unauthenticated requests and `tenant` is `None`
/// when resolution did not attach one; predicates that need either deny in
/// their absence.
pub struct AccessRequest<'a> {
    /// The authenticated user making the request, if any.
    pub actor: Option<&'a User>,

    /// The resolved tenant the request operates under, if any.
    pub tenant: Option<&'a Tenant>,

    /// The request method, used by the read-only predicate.
    pub method: RequestMethod,

    /// The object the request targets, for object-level predicates.
    pub target: Option<&'a dyn Owned>,
}

impl<'a> AccessRequest<'a> {
    /// Build a request for an authenticated actor in a resolved tenant.
    pub fn new(actor: &'a User, tenant: &'a Tenant, method: RequestMethod) -> Self {
        Self {
            actor: Some(actor),
            tenant: Some(tenant),
            method,
            target: None,
        }
    }

    /// Build a request with no actor and no tenant.
    pub fn anonymous(method: RequestMethod) -> Self {
        Self {
            actor: None,
            tenant: None,
            method,
            target: None,
        }
    }

    /// Attach the target object.
    pub fn with_target(mut self, target: &'a dyn Owned) -> Self {
        self.target = Some(target);
        self
    }

    /// The actor, if authenticated and active.
    ///
    /// A deactivated account is treated the same as no actor at all.
    fn authenticated_actor(&self) -> Option<&'a User> {
        self.actor.filter(|actor| actor.is_active)
    }
}

/// Access-control predicates.
///
/// Each predicate is an independent boolean rule; guards compose them with
/// logical AND. See [`crate::Guard`].
///
/// # Examples
///
/// ```
/// use campus_rbac::Predicate;
///
/// assert_eq!(Predicate::TenantMember.as_str(), "tenant_member");
/// assert_eq!(Predicate::CanManageUsers.required_token(), Some("manage_users"));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Actor is authenticated and belongs to the resolved tenant.
    TenantMember,

    /// Actor holds the admin role in the resolved tenant.
    AdminRole,

    /// Actor holds the admin or instructor role in the resolved tenant.
    InstructorOrAdmin,

    /// Actor owns the target object, or holds the admin role.
    OwnerOrAdmin,

    /// One of the actor's roles grants the `manage_users` token.
    CanManageUsers,

    /// One of the actor's roles grants the `manage_roles` token.
    CanManageRoles,

    /// The request method is safe (read-only).
    ReadOnly,
}

impl Predicate {
    /// Get the predicate name surfaced in denials and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenantMember => "tenant_member",
            Self::AdminRole => "admin_role",
            Self::InstructorOrAdmin => "instructor_or_admin",
            Self::OwnerOrAdmin => "owner_or_admin",
            Self::CanManageUsers => "can_manage_users",
            Self::CanManageRoles => "can_manage_roles",
            Self::ReadOnly => "read_only",
        }
    }

    /// The permission token this predicate scans for, if any.
    pub fn required_token(&self) -> Option<&'static str> {
        match self {
            Self::CanManageUsers => Some("manage_users"),
            Self::CanManageRoles => Some("manage_roles"),
            _ => None,
        }
    }

    /// Evaluate this predicate against a request.
    ///
    /// # Arguments
    ///
    /// * `store` - The identity store to query for role membership
    /// * `request` - The access request under evaluation
    ///
    /// # Returns
    ///
    /// `Ok(true)` to allow, `Ok(false)` to deny; `Err` only on store faults.
    pub fn evaluate<S: IdentityStore>(
        &self,
        store: &S,
        request: &AccessRequest<'_>,
    ) -> IdentityResult<bool> {
        match self {
            Self::TenantMember => Ok(Self::member(request).is_some()),

            Self::AdminRole => Self::has_any_role(store, request, &[RoleName::Admin]),

            Self::InstructorOrAdmin => {
                Self::has_any_role(store, request, &[RoleName::Admin, RoleName::Instructor])
            }

            Self::OwnerOrAdmin => {
                let Some(actor) = request.authenticated_actor() else {
                    return Ok(false);
                };
                if let Some(target) = request.target {
                    if target.owner_id() == actor.id {
                        return Ok(true);
                    }
                }
                Self::has_any_role(store, request, &[RoleName::Admin])
            }

            Self::CanManageUsers | Self::CanManageRoles => {
                let Some((actor, tenant)) = Self::member(request) else {
                    return Ok(false);
                };
                // required_token is Some for both arms of this match.
                let Some(token) = self.required_token() else {
                    return Ok(false);
                };
                let roles = store.roles_for_user(actor.id, tenant.id)?;
                Ok(roles.iter().any(|role| role.has_permission(token)))
            }

            Self::ReadOnly => Ok(request.method.is_safe()),
        }
    }

    /// The (actor, tenant) pair when the actor is an authenticated member
    /// of the resolved tenant.
    fn member<'a>(request: &AccessRequest<'a>) -> Option<(&'a User, &'a Tenant)> {
        let actor = request.authenticated_actor()?;
        let tenant = request.tenant?;
        (actor.tenant_id == tenant.id).then_some((actor, tenant))
    }

    fn has_any_role<S: IdentityStore>(
        store: &S,
        request: &AccessRequest<'_>,
        names: &[RoleName],
    ) -> IdentityResult<bool> {
        let Some((actor, tenant)) = Self::member(request) else {
            return Ok(false);
        };
        store.user_has_role(actor.id, tenant.id, names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_identity::{MemoryStore, Role, RoleAssignment};

    struct Fixture {
        store: MemoryStore,
        tenant: Tenant,
        admin: User,
        student: User,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let tenant = store
            .insert_tenant(Tenant::new("Tenant One", "tenant1"))
            .unwrap();
        let admin = store
            .insert_user(User::new(tenant.id, "admin", "admin@example.com"))
            .unwrap();
        let student = store
            .insert_user(User::new(tenant.id, "student", "student@example.com"))
            .unwrap();

        let admin_role = store
            .insert_role(
                Role::new(tenant.id, RoleName::Admin)
                    .with_permissions(["manage_users", "manage_roles"]),
            )
            .unwrap();
        let student_role = store
            .insert_role(Role::new(tenant.id, RoleName::Student).with_permissions(["view_courses"]))
            .unwrap();

        store
            .insert_assignment(RoleAssignment::new(admin.id, admin_role.id, tenant.id))
            .unwrap();
        store
            .insert_assignment(RoleAssignment::new(student.id, student_role.id, tenant.id))
            .unwrap();

        Fixture {
            store,
            tenant,
            admin,
            student,
        }
    }

    #[test]
    fn test_tenant_member_requires_matching_tenant() {
        let f = fixture();
        let other = Tenant::new("Other", "other");

        let same = AccessRequest::new(&f.admin, &f.tenant, RequestMethod::Get);
        assert!(Predicate::TenantMember.evaluate(&f.store, &same).unwrap());

        let crossed = AccessRequest::new(&f.admin, &other, RequestMethod::Get);
        assert!(!Predicate::TenantMember.evaluate(&f.store, &crossed).unwrap());
    }

    #[test]
    fn test_tenant_member_denies_anonymous() {
        let f = fixture();
        let request = AccessRequest::anonymous(RequestMethod::Get);
        assert!(!Predicate::TenantMember.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_tenant_member_denies_deactivated_actor() {
        let f = fixture();
        let mut actor = f.admin.clone();
        actor.is_active = false;

        let request = AccessRequest::new(&actor, &f.tenant, RequestMethod::Get);
        assert!(!Predicate::TenantMember.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_admin_role() {
        let f = fixture();

        let as_admin = AccessRequest::new(&f.admin, &f.tenant, RequestMethod::Post);
        assert!(Predicate::AdminRole.evaluate(&f.store, &as_admin).unwrap());

        let as_student = AccessRequest::new(&f.student, &f.tenant, RequestMethod::Post);
        assert!(!Predicate::AdminRole.evaluate(&f.store, &as_student).unwrap());
    }

    #[test]
    fn test_instructor_or_admin_accepts_either_role() {
        let f = fixture();
        let instructor = f
            .store
            .insert_user(User::new(f.tenant.id, "teach", "teach@example.com"))
            .unwrap();
        let instructor_role = f
            .store
            .insert_role(Role::new(f.tenant.id, RoleName::Instructor))
            .unwrap();
        f.store
            .insert_assignment(RoleAssignment::new(
                instructor.id,
                instructor_role.id,
                f.tenant.id,
            ))
            .unwrap();

        let request = AccessRequest::new(&instructor, &f.tenant, RequestMethod::Post);
        assert!(Predicate::InstructorOrAdmin.evaluate(&f.store, &request).unwrap());

        let as_student = AccessRequest::new(&f.student, &f.tenant, RequestMethod::Post);
        assert!(!Predicate::InstructorOrAdmin
            .evaluate(&f.store, &as_student)
            .unwrap());
    }

    #[test]
    fn test_owner_or_admin_allows_owner() {
        let f = fixture();

        // A student editing their own account.
        let request = AccessRequest::new(&f.student, &f.tenant, RequestMethod::Patch)
            .with_target(&f.student);
        assert!(Predicate::OwnerOrAdmin.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_owner_or_admin_allows_admin_over_foreign_target() {
        let f = fixture();

        let request =
            AccessRequest::new(&f.admin, &f.tenant, RequestMethod::Patch).with_target(&f.student);
        assert!(Predicate::OwnerOrAdmin.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_owner_or_admin_denies_unrelated_actor() {
        let f = fixture();

        let request =
            AccessRequest::new(&f.student, &f.tenant, RequestMethod::Patch).with_target(&f.admin);
        assert!(!Predicate::OwnerOrAdmin.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_manage_tokens_scanned_from_roles() {
        let f = fixture();

        let as_admin = AccessRequest::new(&f.admin, &f.tenant, RequestMethod::Post);
        assert!(Predicate::CanManageUsers.evaluate(&f.store, &as_admin).unwrap());
        assert!(Predicate::CanManageRoles.evaluate(&f.store, &as_admin).unwrap());

        let as_student = AccessRequest::new(&f.student, &f.tenant, RequestMethod::Post);
        assert!(!Predicate::CanManageUsers
            .evaluate(&f.store, &as_student)
            .unwrap());
    }

    #[test]
    fn test_permission_check_reflects_latest_grant() {
        let f = fixture();

        let request = AccessRequest::new(&f.student, &f.tenant, RequestMethod::Post);
        assert!(!Predicate::CanManageUsers.evaluate(&f.store, &request).unwrap());

        // Grant the student a role carrying the token; no cache to go stale.
        let mut role = f
            .store
            .role_by_name(f.tenant.id, RoleName::Student)
            .unwrap()
            .unwrap();
        role.add_permission("manage_users");
        f.store.update_role(role).unwrap();

        assert!(Predicate::CanManageUsers.evaluate(&f.store, &request).unwrap());
    }

    #[test]
    fn test_read_only() {
        let f = fixture();

        let read = AccessRequest::anonymous(RequestMethod::Get);
        assert!(Predicate::ReadOnly.evaluate(&f.store, &read).unwrap());

        let write = AccessRequest::anonymous(RequestMethod::Delete);
        assert!(!Predicate::ReadOnly.evaluate(&f.store, &write).unwrap());
    }
}
