use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use models::user::{UserRole, UserStatus};

/// Business view of a user row. Carries the stored hash and outstanding
/// one-time codes; presentation layers must build their own sanitized view.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub recuperation_code: Option<String>,
    pub verification_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new row; id and timestamps are assigned by the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub verification_code: Option<String>,
}

/// Partial update applied atomically in a single row write.
///
/// The code fields are doubly optional: `None` leaves the column alone,
/// `Some(None)` clears it, `Some(Some(code))` stores a new code.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
    pub recuperation_code: Option<Option<String>>,
    pub verification_code: Option<Option<String>>,
}

/// Login / code-validation result.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
}

/// What a `send-code` request is for; anything other than "confirmation"
/// falls back to a password-recovery code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Confirmation,
    Recovery,
}

impl From<&str> for CodePurpose {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("confirmation") {
            CodePurpose::Confirmation
        } else {
            CodePurpose::Recovery
        }
    }
}
