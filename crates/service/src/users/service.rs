use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::domain::{NewUser, User, UserPatch, UserRole, UserStatus};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserDirectory;
use crate::auth::service::{generate_code, AuthConfig};
use crate::auth::password;
use crate::email::{self, NotificationGateway, TemplateVariables};

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// CRUD on the user resource. The caller decides the role (the public
/// endpoint forces USER; the admin endpoint may create ADMINISTRATOR).
pub struct UsersService<D: UserDirectory> {
    directory: Arc<D>,
    gateway: Arc<dyn NotificationGateway>,
    cfg: AuthConfig,
}

impl<D: UserDirectory + 'static> UsersService<D> {
    pub fn new(directory: Arc<D>, gateway: Arc<dyn NotificationGateway>, cfg: AuthConfig) -> Self {
        Self { directory, gateway, cfg }
    }

    /// Register a user: PENDING status, hashed password, fresh
    /// verification code mailed out (fire-and-forget).
    #[instrument(skip(self, input), fields(email = %input.email, role = ?role))]
    pub async fn create(&self, input: CreateUserInput, role: UserRole) -> Result<User, AuthError> {
        models::user::validate_email(&input.email)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        models::user::validate_name(&input.name)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        models::user::validate_password(&input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.directory.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let code = generate_code();
        let user = self
            .directory
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash: password::hash(&input.password)?,
                status: UserStatus::Pending,
                role,
                verification_code: Some(code.clone()),
            })
            .await?;

        email::dispatch(
            Arc::clone(&self.gateway),
            &self.cfg.template_validation_code,
            TemplateVariables { name: user.name.clone(), email: user.email.clone(), code },
            &user.email,
            &self.cfg.sender,
            "Validation Code",
        );

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Listing of USER-role accounts.
    pub async fn find_all(&self) -> Result<Vec<User>, AuthError> {
        self.directory.list(&[UserRole::User]).await
    }

    /// Listing across all roles.
    pub async fn find_all_admin(&self) -> Result<Vec<User>, AuthError> {
        self.directory
            .list(&[UserRole::User, UserRole::Administrator])
            .await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User, AuthError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<User, AuthError> {
        if let Some(email) = &input.email {
            models::user::validate_email(email)
                .map_err(|e| AuthError::Validation(e.to_string()))?;
        }
        if let Some(name) = &input.name {
            models::user::validate_name(name)
                .map_err(|e| AuthError::Validation(e.to_string()))?;
        }
        self.directory
            .update(id, UserPatch { name: input.name, email: input.email, ..Default::default() })
            .await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn remove(&self, id: Uuid) -> Result<(), AuthError> {
        self.directory.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
