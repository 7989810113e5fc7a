use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Uniform response envelope: `{statusCode, error, data}`. The business
/// layer returns plain values or typed errors; wrapping happens only here.
pub fn envelope<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = serde_json::json!({
        "statusCode": status.as_u16(),
        "error": false,
        "data": data,
    });
    (status, Json(body)).into_response()
}

pub fn error_envelope(status: StatusCode, message_key: &str) -> Response {
    let body = serde_json::json!({
        "statusCode": status.as_u16(),
        "error": true,
        "data": message_key,
    });
    (status, Json(body)).into_response()
}
