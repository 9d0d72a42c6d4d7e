//! Default role templates
//!
//! The fixed permission-set table used by provisioning and seeding. The
//! table is static configuration, passed explicitly to the operations
//! that consume it so tests can substitute alternate templates.

use campus_identity::RoleName;

/// A role to seed into a new tenant.
#[derive(Debug, Clone, Copy)]
pub struct RoleTemplate {
    /// The role name
    pub name: RoleName,

    /// Role description
    pub description: &'static str,

    /// Permission tokens the role grants
    pub permissions: &'static [&'static str],
}

/// The three default roles every tenant starts with.
pub const DEFAULT_ROLE_TEMPLATES: &[RoleTemplate] = &[
    RoleTemplate {
        name: RoleName::Admin,
        description: "Full administrative access to the tenant",
        permissions: &[
            "manage_users",
            "manage_roles",
            "manage_courses",
            "manage_assessments",
            "view_analytics",
            "manage_settings",
        ],
    },
    RoleTemplate {
        name: RoleName::Instructor,
        description: "Creates and manages courses and assessments",
        permissions: &[
            "create_courses",
            "manage_own_courses",
            "create_assessments",
            "grade_submissions",
            "view_student_progress",
            "issue_certificates",
        ],
    },
    RoleTemplate {
        name: RoleName::Student,
        description: "Enrolls in courses and submits assessments",
        permissions: &[
            "enroll_courses",
            "view_courses",
            "submit_assessments",
            "view_own_progress",
            "view_certificates",
        ],
    },
];
