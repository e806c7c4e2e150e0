//! User domain model

use chrono::{DateTime, Utc};
use connect_roles::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for creating a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,

    /// Email address (unique across the platform)
    pub email: String,

    /// Role the account is created with
    pub role: Role,
}

impl NewUser {
    /// Create input from the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

/// A user account.
///
/// # Examples
///
/// ```
/// use connect_accounts::{NewUser, User};
/// use connect_roles::Role;
///
/// let user = User::new(NewUser::new("Amina", "amina@example.cm", Role::Collecteur));
/// assert!(user.is_active);
/// assert!(!user.is_email_verified);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role held by this account
    pub role: Role,

    /// Whether the email address has been confirmed
    pub is_email_verified: bool,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user account from a creation input.
    ///
    /// The account starts active with an unverified email address.
    pub fn new(new: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: new.name,
            email: new.email,
            role: new.role,
            is_email_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
