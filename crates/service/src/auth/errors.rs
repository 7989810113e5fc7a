use thiserror::Error;

/// Business errors for the auth and user workflows.
///
/// The first group is domain failures surfaced to callers with a stable
/// message key; the last group wraps dependency failures (hashing, signing,
/// storage) that must not leak internal detail past the boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("user already exists")]
    Conflict,
    #[error("email not found")]
    EmailNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("password incorrect")]
    InvalidCredential,
    #[error("account disabled")]
    AccountDisabled,
    #[error("code not found")]
    CodeNotFound,
    #[error("missing or invalid token")]
    Unauthorized,
    #[error("insufficient role")]
    Forbidden,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("directory error: {0}")]
    Directory(String),
}

impl AuthError {
    /// Stable machine-readable key surfaced in error payloads.
    pub fn message_key(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::Conflict => "user_already_exists",
            AuthError::EmailNotFound => "email_not_found",
            AuthError::UserNotFound => "user_not_found",
            AuthError::InvalidCredential => "password_incorrect",
            AuthError::AccountDisabled => "user_disable",
            AuthError::CodeNotFound => "code_not_found",
            AuthError::Unauthorized => "unauthorized",
            AuthError::Forbidden => "forbidden",
            AuthError::Hash(_) | AuthError::Token(_) | AuthError::Directory(_) => "internal_error",
        }
    }

    /// Stable numeric code for external mapping/logging.
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::EmailNotFound => 1003,
            AuthError::UserNotFound => 1004,
            AuthError::InvalidCredential => 1005,
            AuthError::AccountDisabled => 1006,
            AuthError::CodeNotFound => 1007,
            AuthError::Unauthorized => 1008,
            AuthError::Forbidden => 1009,
            AuthError::Hash(_) => 1101,
            AuthError::Token(_) => 1102,
            AuthError::Directory(_) => 1200,
        }
    }

    /// True for the dependency-failure group (logged with context, surfaced
    /// as an opaque failure).
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Hash(_) | AuthError::Token(_) | AuthError::Directory(_))
    }
}
