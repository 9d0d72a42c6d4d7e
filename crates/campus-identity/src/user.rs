//! User domain model
//!
//! This module provides the User entity. Users are scoped to exactly one
//! tenant; username and email uniqueness is per tenant, not global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// A user account scoped to one tenant.
///
/// Users are soft-deleted by clearing `is_active`. The password hash is
/// opaque to this crate; hashing and verification live behind the
/// `PasswordHasher` seam in `campus-services`.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use campus_identity::User;
///
/// let tenant_id = Uuid::now_v7();
/// let user = User::new(tenant_id, "alice", "alice@example.com");
/// assert!(user.is_active);
/// assert!(!user.is_staff);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// The tenant this user belongs to
    pub tenant_id: Uuid,

    /// Username, unique within the tenant
    pub username: String,

    /// Email address, unique within the tenant
    pub email: String,

    /// Opaque password hash (empty until a password is set)
    pub password_hash: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Phone number
    pub phone_number: String,

    /// Avatar URL
    pub avatar_url: Option<String>,

    /// Short biography
    pub bio: String,

    /// Whether the account is active (soft-delete flag)
    pub is_active: bool,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Whether the user has staff access
    pub is_staff: bool,

    /// Whether the user has unrestricted access
    pub is_superuser: bool,

    /// IP address of the last login
    pub last_login_ip: Option<IpAddr>,

    /// IANA timezone name
    pub timezone: String,

    /// Preferred language code
    pub language: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user under a tenant.
    ///
    /// The user is created with:
    /// - A newly generated UUID v7 ID
    /// - Active status, unverified, non-staff, non-superuser
    /// - UTC timezone and English language defaults
    /// - An empty password hash (set via the password-hashing seam)
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `username` - Username (unique within the tenant)
    /// * `email` - Email address (unique within the tenant)
    pub fn new(tenant_id: Uuid, username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            username: username.into(),
            email: email.into(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            avatar_url: None,
            bio: String::new(),
            is_active: true,
            is_verified: false,
            is_staff: false,
            is_superuser: false,
            last_login_ip: None,
            timezone: "UTC".to_string(),
            language: "en".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Set staff access.
    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// Full display name, falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Fields required to create a new user.
///
/// The plaintext password is consumed by the user service and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Username (unique within the tenant)
    pub username: String,

    /// Email address (unique within the tenant)
    pub email: String,

    /// Plaintext password to hash and store
    pub password: String,

    /// Optional confirmation; when present it must match `password`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_confirm: Option<String>,

    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Phone number
    #[serde(default)]
    pub phone_number: String,

    /// IANA timezone name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Preferred language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl NewUser {
    /// Create a new user input with the given credentials.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            password_confirm: None,
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            timezone: None,
            language: None,
        }
    }

    /// Set the password confirmation.
    pub fn with_confirmation(mut self, confirm: impl Into<String>) -> Self {
        self.password_confirm = Some(confirm.into());
        self
    }

    /// Set first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }
}

/// A field-level patch for an existing user.
///
/// The tenant reference and password are deliberately absent: neither can
/// be changed through a generic update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
}

impl UserPatch {
    /// Apply this patch to a user, updating only the present fields.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            user.phone_number = phone_number.clone();
        }
        if let Some(avatar_url) = &self.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(timezone) = &self.timezone {
            user.timezone = timezone.clone();
        }
        if let Some(language) = &self.language {
            user.language = language.clone();
        }
        user.updated_at = Utc::now();
    }
}
