//! Error types for identity and store operations
//!
//! This module defines all error types that can occur while reading or
//! writing tenants, users, roles, and role assignments.

use thiserror::Error;

/// Identity error types.
///
/// These errors cover constraint violations, tenant-consistency failures,
/// input validation, and store-level faults.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Referenced tenant does not exist
    #[error("Tenant not found")]
    TenantNotFound,

    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Referenced role does not exist
    #[error("Role not found")]
    RoleNotFound,

    /// Referenced role assignment does not exist
    #[error("Role assignment not found")]
    AssignmentNotFound,

    /// Subdomain is already taken by another tenant (globally unique)
    #[error("A tenant with subdomain '{0}' already exists")]
    DuplicateSubdomain(String),

    /// Username is already taken within the tenant
    #[error("A user with username '{0}' already exists in this tenant")]
    DuplicateUsername(String),

    /// Email is already taken within the tenant
    #[error("A user with email '{0}' already exists in this tenant")]
    DuplicateEmail(String),

    /// The tenant already has a role with this name
    #[error("A role named '{0}' already exists in this tenant")]
    DuplicateRole(String),

    /// The (user, role, tenant) triple already exists
    #[error("User already holds this role in this tenant")]
    DuplicateAssignment,

    /// An entity relationship crosses tenant boundaries.
    ///
    /// `party` names the mismatched side ("User", "Role", or "Assigner").
    #[error("{party} must belong to the same tenant")]
    TenantMismatch { party: &'static str },

    /// Malformed input for a specific field
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Old password did not match the stored hash
    #[error("Old password is incorrect")]
    IncorrectPassword,

    /// The backing store is unavailable or misbehaving
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

impl IdentityError {
    /// Check if this error should be logged at error level.
    ///
    /// Constraint violations and validation failures are expected and
    /// should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, IdentityError::Store(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            IdentityError::TenantNotFound
            | IdentityError::UserNotFound
            | IdentityError::RoleNotFound
            | IdentityError::AssignmentNotFound => 404,

            IdentityError::DuplicateSubdomain(_)
            | IdentityError::DuplicateUsername(_)
            | IdentityError::DuplicateEmail(_)
            | IdentityError::DuplicateRole(_)
            | IdentityError::DuplicateAssignment => 409,

            IdentityError::TenantMismatch { .. }
            | IdentityError::Validation { .. }
            | IdentityError::IncorrectPassword => 400,

            IdentityError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentityError::TenantNotFound => "TENANT_NOT_FOUND",
            IdentityError::UserNotFound => "USER_NOT_FOUND",
            IdentityError::RoleNotFound => "ROLE_NOT_FOUND",
            IdentityError::AssignmentNotFound => "ASSIGNMENT_NOT_FOUND",
            IdentityError::DuplicateSubdomain(_) => "DUPLICATE_SUBDOMAIN",
            IdentityError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            IdentityError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            IdentityError::DuplicateRole(_) => "DUPLICATE_ROLE",
            IdentityError::DuplicateAssignment => "DUPLICATE_ASSIGNMENT",
            IdentityError::TenantMismatch { .. } => "TENANT_MISMATCH",
            IdentityError::Validation { .. } => "VALIDATION_FAILED",
            IdentityError::IncorrectPassword => "INCORRECT_PASSWORD",
            IdentityError::Store(_) => "STORE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_mismatch_message_names_party() {
        let err = IdentityError::TenantMismatch { party: "Role" };
        assert_eq!(err.to_string(), "Role must belong to the same tenant");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(IdentityError::TenantNotFound.status_code(), 404);
        assert_eq!(
            IdentityError::DuplicateUsername("x".into()).status_code(),
            409
        );
        assert_eq!(IdentityError::IncorrectPassword.status_code(), 400);
        assert_eq!(IdentityError::Store("down".into()).status_code(), 500);
    }

    #[test]
    fn test_only_store_faults_are_server_errors() {
        assert!(IdentityError::Store("down".into()).is_server_error());
        assert!(!IdentityError::DuplicateAssignment.is_server_error());
    }
}
