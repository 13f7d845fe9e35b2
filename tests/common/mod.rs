#![allow(dead_code)]

use arreglio_admin::{
    config::AppConfig,
    middleware::auth::AuthUser,
    models::AccountView,
    routes::create_app,
    services::auth_service::issue_token,
    state::AppState,
    storage::Storage,
};
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub async fn test_state() -> AppState {
    state_with(Storage::in_memory()).await
}

pub async fn state_with(storage: Storage) -> AppState {
    AppState::load(AppConfig::local(SECRET), storage)
        .await
        .expect("state loads")
}

pub fn staff() -> AuthUser {
    AuthUser {
        user_id: "staff-1".into(),
        email: "staff@arreglio.local".into(),
        role: "staff".into(),
    }
}

pub fn bearer(state: &AppState, role: &str) -> String {
    let account = AccountView {
        id: format!("{role}-1"),
        email: format!("{role}@arreglio.local"),
        role: role.to_string(),
        created_at: Utc::now(),
    };
    let (token, _) = issue_token(&state.config, &account).expect("token");
    format!("Bearer {token}")
}

pub fn app(state: &AppState) -> Router {
    create_app(state.clone())
}

/// Sends a JSON request and returns the status and parsed body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Sends a raw body and returns the status, headers and undecoded body.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}

/// Builds a multipart body holding one file per `(file_name, content_type, bytes)`.
pub fn multipart(files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "arreglio-test-boundary";
    let mut body = Vec::new();
    for (name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
