use std::sync::Arc;

use rand::{rngs::OsRng, Rng};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::email::{self, NotificationGateway, TemplateVariables};

use super::domain::{AuthTokens, CodePurpose, User, UserPatch, UserStatus};
use super::errors::AuthError;
use super::repository::UserDirectory;
use super::{password, token};

/// Immutable service configuration, built once at startup from `configs`.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub sender: String,
    pub template_reset_password: String,
    pub template_validation_code: String,
}

impl AuthConfig {
    pub fn from_app_config(cfg: &configs::AppConfig) -> Self {
        Self {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
            sender: cfg.email.sender.clone(),
            template_reset_password: cfg.email.template_reset_password.clone(),
            template_validation_code: cfg.email.template_validation_code.clone(),
        }
    }
}

/// Fresh one-time code: 4 decimal digits, uniform in [1000, 9999].
pub fn generate_code() -> String {
    OsRng.gen_range(1000u16..=9999).to_string()
}

/// Credential & code workflows, independent of the web framework.
///
/// Reads and mutates user state only through the directory; never touches
/// storage directly. Email dispatch is fire-and-forget.
pub struct AuthService<D: UserDirectory> {
    directory: Arc<D>,
    gateway: Arc<dyn NotificationGateway>,
    cfg: AuthConfig,
}

impl<D: UserDirectory + 'static> AuthService<D> {
    pub fn new(directory: Arc<D>, gateway: Arc<dyn NotificationGateway>, cfg: AuthConfig) -> Self {
        Self { directory, gateway, cfg }
    }

    /// Check credentials and issue a session token.
    ///
    /// Only INACTIVE blocks login; a PENDING account that knows its
    /// password may still authenticate.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;
        if !password::verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredential);
        }
        if user.status == UserStatus::Inactive {
            return Err(AuthError::AccountDisabled);
        }
        let access_token = self.issue_token(&user)?;
        debug!(user_id = %user.id, "login successful");
        Ok(AuthTokens { access_token })
    }

    /// Sign a token for `user`. Signing failures are logged here and
    /// propagated as an opaque error value.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        token::sign(user, &self.cfg.jwt_secret, self.cfg.token_ttl_hours).map_err(|e| {
            error!(user_id = %user.id, error = %e, "token signing failed");
            e
        })
    }

    /// Start password recovery: store a fresh code and mail it.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &str) -> Result<&'static str, AuthError> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;
        let code = generate_code();
        self.directory
            .update(
                user.id,
                UserPatch { recuperation_code: Some(Some(code.clone())), ..Default::default() },
            )
            .await?;
        self.dispatch_email(
            &self.cfg.template_reset_password,
            TemplateVariables { name: user.name.clone(), email: user.email.clone(), code },
            &user.email,
            "Recuperation Password",
        );
        info!(user_id = %user.id, "password reset requested");
        Ok("email_send")
    }

    /// Issue and mail a fresh code; `Confirmation` refreshes the
    /// registration code, anything else the recovery code. Last writer
    /// wins when calls race.
    #[instrument(skip(self), fields(email = %email, purpose = ?purpose))]
    pub async fn send_code(&self, email: &str, purpose: CodePurpose) -> Result<&'static str, AuthError> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;
        let code = generate_code();
        let patch = match purpose {
            CodePurpose::Confirmation => {
                UserPatch { verification_code: Some(Some(code.clone())), ..Default::default() }
            }
            CodePurpose::Recovery => {
                UserPatch { recuperation_code: Some(Some(code.clone())), ..Default::default() }
            }
        };
        self.directory.update(user.id, patch).await?;
        self.dispatch_email(
            &self.cfg.template_validation_code,
            TemplateVariables { name: user.name.clone(), email: user.email.clone(), code },
            &user.email,
            "Validation Code",
        );
        Ok("email_send")
    }

    /// Prove control of the recovery code. Deliberately does not consume
    /// the code: it stays valid until `reset_password` clears it, so the
    /// check is idempotent.
    #[instrument(skip(self, code), fields(email = %email))]
    pub async fn validate_password_reset_code(
        &self,
        code: &str,
        email: &str,
    ) -> Result<AuthTokens, AuthError> {
        let user = self
            .directory
            .find_by_email_and_recuperation_code(email, code)
            .await?
            .ok_or(AuthError::CodeNotFound)?;
        let access_token = self.issue_token(&user)?;
        Ok(AuthTokens { access_token })
    }

    /// Activate a PENDING account. The verification code is single-use:
    /// it is cleared in the same update that flips the status, so a second
    /// call with the same code fails with `CodeNotFound`.
    #[instrument(skip(self, code), fields(user_id = %user_id))]
    pub async fn validate_registration_code(
        &self,
        code: &str,
        user_id: Uuid,
    ) -> Result<AuthTokens, AuthError> {
        let user = self
            .directory
            .find_by_id_and_verification_code(user_id, code)
            .await?
            .ok_or(AuthError::CodeNotFound)?;
        let user = self
            .directory
            .update(
                user.id,
                UserPatch {
                    status: Some(UserStatus::Active),
                    verification_code: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %user.id, "account activated");
        let access_token = self.issue_token(&user)?;
        Ok(AuthTokens { access_token })
    }

    /// Store a new password hash and clear the recovery code in one
    /// directory update, so no state exists where the new hash and the old
    /// code are both live.
    #[instrument(skip(self, new_password), fields(user_id = %user_id))]
    pub async fn reset_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<AuthTokens, AuthError> {
        models::user::validate_password(new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let user = self
            .directory
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let hash = password::hash(new_password)?;
        let user = self
            .directory
            .update(
                user.id,
                UserPatch {
                    password_hash: Some(hash),
                    recuperation_code: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id = %user.id, "password reset");
        let access_token = self.issue_token(&user)?;
        Ok(AuthTokens { access_token })
    }

    fn dispatch_email(&self, template_id: &str, vars: TemplateVariables, to: &str, subject: &str) {
        email::dispatch(Arc::clone(&self.gateway), template_id, vars, to, &self.cfg.sender, subject);
    }
}
