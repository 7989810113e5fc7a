use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service::auth::domain::{User, UserRole, UserStatus};
use service::auth::AuthError;
use service::users::{CreateUserInput, UpdateUserInput};
use uuid::Uuid;

use crate::envelope::envelope;
use crate::errors::ApiError;
use crate::guard::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Sanitized projection of a user row. The stored hash and any
/// outstanding one-time codes never leave the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        UserView {
            id: u.id,
            name: u.name,
            email: u.email,
            status: u.status,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// POST /users/user (public self-registration)
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users_service()
        .create(
            CreateUserInput {
                name: body.name,
                email: body.email,
                password: body.password,
            },
            UserRole::User,
        )
        .await?;
    Ok(envelope(StatusCode::CREATED, UserView::from(user)))
}

/// POST /users/admin
pub async fn create_admin(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users_service()
        .create(
            CreateUserInput {
                name: body.name,
                email: body.email,
                password: body.password,
            },
            UserRole::Administrator,
        )
        .await?;
    Ok(envelope(StatusCode::CREATED, UserView::from(user)))
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.users_service().find_all().await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();
    Ok(envelope(StatusCode::OK, views))
}

/// GET /users/admin
pub async fn list_admin(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.users_service().find_all_admin().await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();
    Ok(envelope(StatusCode::OK, views))
}

/// GET /users/detail/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user = state.users_service().find_one(id).await?;
    Ok(envelope(StatusCode::OK, UserView::from(user)))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users_service()
        .update(id, UpdateUserInput { name: body.name, email: body.email })
        .await?;
    Ok(envelope(StatusCode::OK, UserView::from(user)))
}

/// DELETE /users/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    if caller.role != UserRole::Administrator {
        return Err(AuthError::Forbidden.into());
    }
    state.users_service().remove(id).await?;
    Ok(envelope(StatusCode::OK, serde_json::json!({ "deleted": id })))
}
