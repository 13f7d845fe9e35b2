mod common;

use arreglio_admin::services::auth_service::ensure_admin_account;
use axum::http::StatusCode;
use serde_json::json;

use common::{app, bearer, send, test_state};

#[tokio::test]
async fn bootstrap_admin_can_log_in_and_register_staff() {
    let state = test_state().await;
    ensure_admin_account(&state).await.unwrap();
    // Idempotent.
    ensure_admin_account(&state).await.unwrap();
    let app = app(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@arreglio.local", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "Admin@Arreglio.local", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(token.starts_with("Bearer "));
    assert_eq!(body["data"]["account"]["role"], "admin");
    assert!(body["data"]["expiresAt"].is_string());

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "admin@arreglio.local");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "email": "nuria@arreglio.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "staff");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "email": "nuria@arreglio.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nuria@arreglio.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn staff_cannot_register_accounts() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let (status, _) = send(
        &app(&state),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "email": "x@arreglio.com", "password": "long-enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn short_password_is_a_field_error() {
    let state = test_state().await;
    let token = bearer(&state, "admin");
    let (status, body) = send(
        &app(&state),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "email": "x@arreglio.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["fields"]["password"].is_string());
}

#[tokio::test]
async fn token_for_unknown_account_is_rejected_by_me() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let (status, _) = send(&app(&state), "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
