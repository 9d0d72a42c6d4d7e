//! Subscription plans
//!
//! This module defines the subscription plans available to tenants.

use serde::{Deserialize, Serialize};

/// Subscription plan for a tenant.
///
/// Plans gate feature access in the surrounding platform; this core only
/// records the plan on the tenant.
///
/// # Examples
///
/// ```
/// use campus_identity::SubscriptionPlan;
///
/// let plan = SubscriptionPlan::Professional;
/// assert_eq!(plan.as_str(), "professional");
/// assert!(plan.is_paid());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// Free plan
    Free,

    /// Basic paid plan
    Basic,

    /// Professional plan
    Professional,

    /// Enterprise plan
    Enterprise,
}

impl SubscriptionPlan {
    /// Parse plan from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(SubscriptionPlan)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(Self::Free),
            "basic" => Some(Self::Basic),
            "professional" => Some(Self::Professional),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Get string representation of the plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Get a human-readable display name for the plan.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Basic => "Basic",
            Self::Professional => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Check if this is a paid plan.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Free)
    }
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        Self::Free
    }
}
