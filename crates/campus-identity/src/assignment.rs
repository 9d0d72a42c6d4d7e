//! Role assignment domain model
//!
//! This module provides the grant record linking a user to a role within a
//! tenant, recording who granted it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assignment of one role to one user within one tenant.
///
/// The (user, role, tenant) triple is unique: a user cannot hold the same
/// role twice in the same tenant, though they may hold several distinct
/// roles simultaneously.
///
/// `assigned_by` is nullable: when the assigner's account is later removed
/// the reference is nulled, never erasing history of the grant itself.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use campus_identity::RoleAssignment;
///
/// let assignment = RoleAssignment::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
/// assert!(assignment.assigned_by.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Unique assignment ID
    pub id: Uuid,

    /// The user receiving the role
    pub user_id: Uuid,

    /// The role being granted
    pub role_id: Uuid,

    /// The tenant both user and role must belong to
    pub tenant_id: Uuid,

    /// Who granted the role, if known
    pub assigned_by: Option<Uuid>,

    /// When the role was granted
    pub created_at: DateTime<Utc>,

    /// When the assignment was last updated
    pub updated_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Creates a new role assignment with no recorded assigner.
    ///
    /// Tenant-consistency (user, role, and assigner all belonging to
    /// `tenant_id`) is enforced by the store on insert, not here.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user receiving the role
    /// * `role_id` - The role being granted
    /// * `tenant_id` - The tenant scope of the grant
    pub fn new(user_id: Uuid, role_id: Uuid, tenant_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            role_id,
            tenant_id,
            assigned_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set who granted this role.
    pub fn with_assigner(mut self, assigner_id: Uuid) -> Self {
        self.assigned_by = Some(assigner_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_creation() {
        let user_id = Uuid::now_v7();
        let role_id = Uuid::now_v7();
        let tenant_id = Uuid::now_v7();

        let assignment = RoleAssignment::new(user_id, role_id, tenant_id);

        assert_eq!(assignment.user_id, user_id);
        assert_eq!(assignment.role_id, role_id);
        assert_eq!(assignment.tenant_id, tenant_id);
        assert!(assignment.assigned_by.is_none());
    }

    #[test]
    fn test_assignment_with_assigner() {
        let assigner_id = Uuid::now_v7();
        let assignment = RoleAssignment::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7())
            .with_assigner(assigner_id);

        assert_eq!(assignment.assigned_by, Some(assigner_id));
    }
}
