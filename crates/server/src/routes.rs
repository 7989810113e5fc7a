use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::guard;
use crate::state::AppState;

pub mod auth;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth endpoints, the public
/// registration endpoint, and the guarded user-management surface.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth", post(auth::login))
        .route("/auth/request-reset", post(auth::request_reset))
        .route(
            "/auth/validate-code-forgot/:email/:code",
            get(auth::validate_code_forgot),
        )
        .route("/auth/send-code/:email/:type_send", get(auth::send_code))
        .route(
            "/auth/validate-code-register/:user_id/:code",
            get(auth::validate_code_register),
        )
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/users/user", post(users::register));

    let admin = Router::new()
        .route("/users/admin", post(users::create_admin).get(users::list_admin))
        .route("/users", get(users::list))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::admin_only,
        ));

    // Deletion is admin-only; the handler checks the resolved caller's
    // role because the path is shared with the update endpoint.
    let shared = Router::new()
        .route("/users/detail/:id", get(users::detail))
        .route("/users/:id", put(users::update).delete(users::remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::admin_or_user,
        ));

    public
        .merge(admin)
        .merge(shared)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
