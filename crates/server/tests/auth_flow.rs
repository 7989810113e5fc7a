use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use service::auth::repo::SeaOrmUserDirectory;
use service::auth::repository::UserDirectory;
use service::auth::AuthConfig;
use service::email::ConsoleGateway;
use tower::Service;
use uuid::Uuid;

use server::routes;
use server::state::AppState;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".into(),
        token_ttl_hours: 1,
        sender: "no-reply@test.local".into(),
        template_reset_password: "reset-password".into(),
        template_validation_code: "validation-code".into(),
    }
}

async fn build_app() -> anyhow::Result<(Router, Arc<SeaOrmUserDirectory>)> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let state = AppState {
        db: db.clone(),
        auth: test_auth_config(),
        gateway: Arc::new(ConsoleGateway),
    };
    let directory = Arc::new(SeaOrmUserDirectory { db });
    Ok((routes::build_router(state, cors()), directory))
}

async fn body_json(resp: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

fn unique_email() -> String {
    format!("user_{}@example.com", Uuid::new_v4())
}

async fn register(app: &Router, email: &str, password: &str) -> anyhow::Result<Response> {
    let req = json_request(
        "POST",
        "/users/user",
        &json!({"name": "Tester", "email": email, "password": password}),
    )?;
    Ok(app.clone().call(req).await?)
}

async fn login(app: &Router, email: &str, password: &str) -> anyhow::Result<Response> {
    let req = json_request("POST", "/auth", &json!({"email": email, "password": password}))?;
    Ok(app.clone().call(req).await?)
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "S3curePass!").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await?;
    assert_eq!(body["error"], json!(false));
    assert_eq!(body["data"]["email"], json!(email));
    assert_eq!(body["data"]["status"], json!("PENDING"));
    assert!(body["data"].get("password").is_none());

    // A PENDING account may already log in.
    let resp = login(&app, &email, "S3curePass!").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await?;
    assert!(body["data"]["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = login(&app, &email, "wrong-password").await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await?;
    assert_eq!(body["data"], json!("password_incorrect"));
    Ok(())
}

#[tokio::test]
async fn test_login_unknown_email() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;

    let resp = login(&app, &unique_email(), "whatever123").await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await?;
    assert_eq!(body["data"], json!("email_not_found"));
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;

    let resp = register(&app, &unique_email(), "short").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_password_reset_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, directory) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "OldPassword1").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = json_request("POST", "/auth/request-reset", &json!({"email": email}))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await?;
    assert_eq!(body["data"], json!("email_send"));

    // The code travels by email; here we read it from the directory.
    let user = directory.find_by_email(&email).await?.expect("registered user");
    let code = user.recuperation_code.clone().expect("reset code stored");
    assert_eq!(code.len(), 4);

    // Validation does not consume the code.
    for _ in 0..2 {
        let req = Request::builder()
            .method("GET")
            .uri(format!("/auth/validate-code-forgot/{}/{}", email, code))
            .body(Body::empty())?;
        let resp = app.clone().call(req).await?;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = json_request(
        "POST",
        "/auth/reset-password",
        &json!({"userId": user.id, "password": "NewPassword1"}),
    )?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Old password is dead, new one works, code is cleared.
    let resp = login(&app, &email, "OldPassword1").await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let resp = login(&app, &email, "NewPassword1").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = Request::builder()
        .method("GET")
        .uri(format!("/auth/validate-code-forgot/{}/{}", email, code))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn test_registration_code_is_single_use() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, directory) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let user = directory.find_by_email(&email).await?.expect("registered user");
    let code = user.verification_code.clone().expect("verification code stored");

    let uri = format!("/auth/validate-code-register/{}/{}", user.id, code);
    let req = Request::builder().method("GET").uri(&uri).body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let activated = directory.find_by_email(&email).await?.expect("activated user");
    assert!(activated.verification_code.is_none());

    let req = Request::builder().method("GET").uri(&uri).body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn test_guard_rejects_missing_and_non_admin_tokens() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _) = build_app().await?;
    let email = unique_email();

    // No token at all.
    let req = Request::builder().method("GET").uri("/users").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = login(&app, &email, "StrongPass123").await?;
    let body = body_json(resp).await?;
    let token = body["data"]["accessToken"].as_str().expect("token").to_string();

    // Regular users cannot list accounts.
    let req = Request::builder()
        .method("GET")
        .uri("/users")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // But they may fetch a detail view.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/users/detail/{}", Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Garbage tokens fail verification.
    let req = Request::builder()
        .method("GET")
        .uri("/users")
        .header("Authorization", "Bearer not-a-token")
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_guard_rejects_deleted_user_token() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, directory) = build_app().await?;
    let email = unique_email();

    let resp = register(&app, &email, "StrongPass123").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = login(&app, &email, "StrongPass123").await?;
    let body = body_json(resp).await?;
    let token = body["data"]["accessToken"].as_str().expect("token").to_string();

    let user = directory.find_by_email(&email).await?.expect("registered user");
    directory.delete(user.id).await?;

    let req = Request::builder()
        .method("GET")
        .uri(format!("/users/detail/{}", user.id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
