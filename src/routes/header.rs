use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};

use crate::{
    dto::header::{LanguageList, MarkAllRead, NotificationList, SetLanguageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Notification,
    response::ApiResponse,
    routes::params::NotificationQuery,
    services::header_service,
    state::AppState,
    stores::header::Language,
};

pub fn notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", patch(mark_read))
        .route("/{id}", delete(dismiss))
}

pub fn languages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_languages))
        .route("/current", put(set_language))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQuery),
    responses((status = 200, description = "Notifications, newest first", body = ApiResponse<NotificationList>)),
    tag = "Header"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let resp = header_service::list_notifications(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification ID")),
    responses((status = 200, description = "Marked as read", body = ApiResponse<Notification>)),
    tag = "Header"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let resp = header_service::mark_read(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses((status = 200, description = "All marked as read", body = ApiResponse<MarkAllRead>)),
    tag = "Header"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<MarkAllRead>>> {
    let resp = header_service::mark_all_read(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification ID")),
    responses((status = 200, description = "Dismissed", body = ApiResponse<Notification>)),
    tag = "Header"
)]
pub async fn dismiss(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let resp = header_service::dismiss(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/languages",
    responses((status = 200, description = "Supported languages", body = ApiResponse<LanguageList>)),
    tag = "Header"
)]
pub async fn list_languages(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<LanguageList>>> {
    let resp = header_service::list_languages(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/languages/current",
    request_body = SetLanguageRequest,
    responses(
        (status = 200, description = "Language changed", body = ApiResponse<Language>),
        (status = 400, description = "Unsupported language")
    ),
    tag = "Header"
)]
pub async fn set_language(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<SetLanguageRequest>,
) -> AppResult<Json<ApiResponse<Language>>> {
    let resp = header_service::set_language(&state, &payload.code).await?;
    Ok(Json(resp))
}
