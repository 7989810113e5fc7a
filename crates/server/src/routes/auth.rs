use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use service::auth::domain::CodePurpose;
use uuid::Uuid;

use crate::envelope::envelope;
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub user_id: Uuid,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// POST /auth
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let tokens = state
        .auth_service()
        .authenticate(&body.email, &body.password)
        .await?;
    Ok(envelope(
        StatusCode::CREATED,
        TokenResponse { access_token: tokens.access_token },
    ))
}

/// POST /auth/request-reset
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestResetRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.auth_service().request_password_reset(&body.email).await?;
    Ok(envelope(StatusCode::CREATED, outcome))
}

/// GET /auth/validate-code-forgot/:email/:code
pub async fn validate_code_forgot(
    State(state): State<AppState>,
    Path((email, code)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let tokens = state
        .auth_service()
        .validate_password_reset_code(&code, &email)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        TokenResponse { access_token: tokens.access_token },
    ))
}

/// GET /auth/send-code/:email/:type_send
pub async fn send_code(
    State(state): State<AppState>,
    Path((email, type_send)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let purpose = CodePurpose::from(type_send.as_str());
    let outcome = state.auth_service().send_code(&email, purpose).await?;
    Ok(envelope(StatusCode::OK, outcome))
}

/// GET /auth/validate-code-register/:user_id/:code
pub async fn validate_code_register(
    State(state): State<AppState>,
    Path((user_id, code)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let tokens = state
        .auth_service()
        .validate_registration_code(&code, user_id)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        TokenResponse { access_token: tokens.access_token },
    ))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    let tokens = state
        .auth_service()
        .reset_password(body.user_id, &body.password)
        .await?;
    Ok(envelope(
        StatusCode::CREATED,
        TokenResponse { access_token: tokens.access_token },
    ))
}
