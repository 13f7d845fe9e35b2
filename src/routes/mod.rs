use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod auth;
pub mod dashboard;
pub mod doc;
pub mod header;
pub mod health;
pub mod labels;
pub mod orders;
pub mod params;
pub mod services;
pub mod team;
pub mod website;
pub mod workspace;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/team", team::router())
        .nest("/board", orders::board_router())
        .nest("/orders", orders::router())
        .nest("/labels", labels::router())
        .nest("/services", services::router())
        .nest("/website", website::router())
        .nest("/stores", website::public_router())
        .nest("/notifications", header::notifications_router())
        .nest("/languages", header::languages_router())
        .route("/dashboard", get(dashboard::summary))
}

/// `/health`, `/api`, `/docs` and the JSON fallback, bound to `state`.
/// Tracing, request ids and concurrency limits are layered on by the binary.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
