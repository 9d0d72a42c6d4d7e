//! Role domain model
//!
//! This module provides tenant-scoped roles: named bundles of permission
//! tokens. Each tenant has at most one role per name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Well-known role names.
///
/// Each tenant may hold at most one role of each name.
///
/// # Examples
///
/// ```
/// use campus_identity::RoleName;
///
/// assert_eq!(RoleName::parse("admin"), Some(RoleName::Admin));
/// assert_eq!(RoleName::Instructor.as_str(), "instructor");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// Full access to tenant resources
    Admin,

    /// Creates and manages courses
    Instructor,

    /// Enrolls in courses
    Student,
}

impl RoleName {
    /// Parse role name from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(RoleName)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "instructor" => Some(Self::Instructor),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Get string representation of the role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Instructor => "instructor",
            Self::Student => "student",
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Instructor => "Instructor",
            Self::Student => "Student",
        }
    }
}

/// A named permission bundle scoped to one tenant.
///
/// Permissions are opaque string tokens (e.g. `"manage_users"`); order is
/// irrelevant, so they are kept as a set.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use campus_identity::{Role, RoleName};
///
/// let role = Role::new(Uuid::now_v7(), RoleName::Admin)
///     .with_permissions(["manage_users", "manage_roles"]);
/// assert!(role.has_permission("manage_users"));
/// assert!(!role.has_permission("enroll_courses"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier for the role
    pub id: Uuid,

    /// The tenant this role belongs to
    pub tenant_id: Uuid,

    /// Role name, unique within the tenant
    pub name: RoleName,

    /// Optional description
    pub description: String,

    /// Permission tokens granted by this role
    #[serde(default)]
    pub permissions: BTreeSet<String>,

    /// Whether this role was created by default provisioning/seeding
    pub is_system_role: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// When the role was last updated
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role for a tenant.
    ///
    /// The role is created as a system role with an empty permission set.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `name` - The role name (unique within the tenant)
    pub fn new(tenant_id: Uuid, name: RoleName) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            name,
            description: String::new(),
            permissions: BTreeSet::new(),
            is_system_role: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the permission tokens.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Mark whether this is a system role.
    pub fn with_system_role(mut self, is_system_role: bool) -> Self {
        self.is_system_role = is_system_role;
        self
    }

    /// Check if this role grants a permission token.
    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.contains(token)
    }

    /// Add a permission token to this role.
    pub fn add_permission(&mut self, token: impl Into<String>) {
        self.permissions.insert(token.into());
        self.updated_at = Utc::now();
    }

    /// Remove a permission token from this role.
    ///
    /// # Returns
    ///
    /// `true` if the token was present, `false` otherwise
    pub fn remove_permission(&mut self, token: &str) -> bool {
        let removed = self.permissions.remove(token);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}
