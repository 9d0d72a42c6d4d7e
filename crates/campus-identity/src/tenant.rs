//! Tenant domain model
//!
//! This module provides the core Tenant entity. Tenants are isolated
//! organizations: no data or action from one tenant is visible to or
//! affects another.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::plan::SubscriptionPlan;

static SUBDOMAIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Validate a tenant subdomain slug.
///
/// Subdomains are lowercase alphanumeric with hyphens, 1-63 characters,
/// and may not start or end with a hyphen.
///
/// # Examples
///
/// ```
/// use campus_identity::validate_subdomain;
///
/// assert!(validate_subdomain("test-co").is_ok());
/// assert!(validate_subdomain("Test-Co").is_err());
/// ```
pub fn validate_subdomain(subdomain: &str) -> IdentityResult<()> {
    if SUBDOMAIN_PATTERN.is_match(subdomain) {
        Ok(())
    } else {
        Err(IdentityError::Validation {
            field: "subdomain",
            message: "Subdomain must be lowercase alphanumeric with hyphens".to_string(),
        })
    }
}

/// A tenant is an isolated organization in the multi-tenant system.
///
/// Each tenant has its own users, roles, and role assignments. Tenants are
/// soft-disabled by clearing `is_active`; this core never hard-deletes them.
///
/// # Examples
///
/// ```
/// use campus_identity::Tenant;
///
/// let tenant = Tenant::new("Test Co", "test-co");
/// assert_eq!(tenant.name, "Test Co");
/// assert!(tenant.is_active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier for the tenant
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-safe slug, unique across the platform and immutable once in use
    pub subdomain: String,

    /// Whether the tenant is active
    pub is_active: bool,

    /// Arbitrary tenant-level settings
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,

    /// Subscription plan
    pub plan: SubscriptionPlan,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Creates a new tenant with default settings.
    ///
    /// The tenant is created with:
    /// - A newly generated UUID v7 ID
    /// - The Free subscription plan
    /// - Active status
    /// - Current timestamp for created_at and updated_at
    ///
    /// The subdomain is not validated here; see [`validate_subdomain`].
    ///
    /// # Arguments
    ///
    /// * `name` - The tenant name
    /// * `subdomain` - URL-safe slug (must be unique)
    pub fn new(name: impl Into<String>, subdomain: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            subdomain: subdomain.into(),
            is_active: true,
            settings: HashMap::new(),
            plan: SubscriptionPlan::Free,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the subscription plan.
    pub fn with_plan(mut self, plan: SubscriptionPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Set the initial settings map.
    pub fn with_settings(mut self, settings: HashMap<String, serde_json::Value>) -> Self {
        self.settings = settings;
        self
    }

    /// Merge a partial settings map into the existing settings.
    ///
    /// This is a shallow merge: new keys overwrite, untouched keys persist.
    /// It is not a replace.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_identity::Tenant;
    /// use serde_json::json;
    ///
    /// let mut tenant = Tenant::new("Test Co", "test-co");
    /// tenant.settings.insert("existing".into(), json!("value"));
    /// tenant.merge_settings([("theme".to_string(), json!("dark"))]);
    ///
    /// assert_eq!(tenant.settings["existing"], json!("value"));
    /// assert_eq!(tenant.settings["theme"], json!("dark"));
    /// ```
    pub fn merge_settings<I>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        for (key, value) in patch {
            self.settings.insert(key, value);
        }
        self.updated_at = Utc::now();
    }
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    /// Human-readable name
    pub name: String,

    /// URL-safe slug (must be unique and well-formed)
    pub subdomain: String,

    /// Subscription plan (defaults to Free)
    #[serde(default)]
    pub plan: SubscriptionPlan,

    /// Initial settings map
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl NewTenant {
    /// Create a new tenant input with the Free plan and empty settings.
    pub fn new(name: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdomain: subdomain.into(),
            plan: SubscriptionPlan::Free,
            settings: HashMap::new(),
        }
    }
}
