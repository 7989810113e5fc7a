use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::auth::AuthError;
use tracing::error;

use crate::envelope::error_envelope;

/// Presentation-layer error: maps the business taxonomy onto HTTP.
///
/// Domain failures keep their stable message key and a 4xx status;
/// dependency failures are logged with full context and collapse to an
/// opaque 500.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError(e)
    }
}

fn status_for(e: &AuthError) -> StatusCode {
    match e {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::EmailNotFound
        | AuthError::UserNotFound
        | AuthError::InvalidCredential
        | AuthError::AccountDisabled
        | AuthError::CodeNotFound => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::Hash(_) | AuthError::Token(_) | AuthError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_internal() {
            error!(error = %self.0, code = self.0.code(), "dependency failure");
        }
        error_envelope(status, self.0.message_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(status_for(&AuthError::EmailNotFound), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&AuthError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AuthError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&AuthError::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AuthError::Directory("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
