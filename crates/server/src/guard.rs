use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use service::auth::domain::{User, UserRole};
use service::auth::repository::UserDirectory;
use service::auth::{token, AuthError};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved from the bearer token and re-read
/// from the directory so revoked or deleted accounts are rejected even
/// while their token is still within its lifetime.
#[derive(Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(req: &Request) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;
    header.strip_prefix("Bearer ").ok_or(AuthError::Unauthorized)
}

async fn authorize(
    state: &AppState,
    req: &mut Request,
    allowed: &[UserRole],
) -> Result<(), AuthError> {
    let path = req.uri().path().to_string();
    let token = match bearer_token(req) {
        Ok(t) => t.to_string(),
        Err(e) => {
            warn!(path = %path, "missing or malformed Authorization header");
            return Err(e);
        }
    };

    let claims = token::verify(&token, &state.auth.jwt_secret).map_err(|e| {
        warn!(path = %path, "token validation failed");
        e
    })?;

    // Claims only prove who the caller was at issue time. The account is
    // re-resolved so a user deleted after login no longer passes.
    let user = state
        .directory()
        .find_by_email(&claims.email)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    if !allowed.contains(&user.role) {
        warn!(path = %path, user_id = %user.id, role = ?user.role, "role not permitted");
        return Err(AuthError::Forbidden);
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(())
}

pub async fn admin_only(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, &mut req, &[UserRole::Administrator]).await?;
    Ok(next.run(req).await)
}

pub async fn admin_or_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, &mut req, &[UserRole::Administrator, UserRole::User]).await?;
    Ok(next.run(req).await)
}
