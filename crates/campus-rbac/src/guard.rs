//! # Guards
//!
//! AND-composition of predicates for a single operation. Every predicate
//! must pass; the first failure names the predicate that denied.

use thiserror::Error;
use tracing::debug;

use campus_identity::{IdentityError, IdentityStore};

use crate::predicates::{AccessRequest, Predicate};

/// Access check failure.
///
/// Denial is distinct from a store fault: denial means the actor is known
/// but disallowed, while a store fault means the check itself could not run.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A predicate returned false; carries the predicate name.
    #[error("Access denied by '{0}'")]
    Denied(&'static str),

    /// The identity store failed while evaluating a predicate.
    #[error(transparent)]
    Store(#[from] IdentityError),
}

impl AccessError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Denied(_) => 403,
            AccessError::Store(err) => err.status_code(),
        }
    }
}

/// An AND-composition of predicates guarding one operation.
///
/// # Examples
///
/// ```
/// use campus_identity::MemoryStore;
/// use campus_rbac::{AccessRequest, Guard, Predicate, RequestMethod};
///
/// let store = MemoryStore::new();
/// let guard = Guard::new()
///     .require(Predicate::TenantMember)
///     .require(Predicate::CanManageUsers);
///
/// let request = AccessRequest::anonymous(RequestMethod::Post);
/// let denied = guard.check(&store, &request).unwrap_err();
/// assert_eq!(denied.to_string(), "Access denied by 'tenant_member'");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Guard {
    predicates: Vec<Predicate>,
}

impl Guard {
    /// Create an empty guard, which allows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required predicate.
    pub fn require(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Evaluate all predicates in order.
    ///
    /// # Returns
    ///
    /// `Ok(())` if every predicate allows, or the first denial/store fault.
    pub fn check<S: IdentityStore>(
        &self,
        store: &S,
        request: &AccessRequest<'_>,
    ) -> Result<(), AccessError> {
        for predicate in &self.predicates {
            if !predicate.evaluate(store, request)? {
                debug!(predicate = predicate.as_str(), "access denied");
                return Err(AccessError::Denied(predicate.as_str()));
            }
        }
        Ok(())
    }
}
