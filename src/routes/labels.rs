use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::labels::LabelList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Label,
    response::ApiResponse,
    services::label_service,
    state::AppState,
    stores::labels::NewLabel,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_labels).post(create_label))
        .route("/{id}", delete(delete_label))
}

#[utoipa::path(
    get,
    path = "/api/labels",
    responses((status = 200, description = "Predefined and custom labels", body = ApiResponse<LabelList>)),
    tag = "Labels"
)]
pub async fn list_labels(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<LabelList>>> {
    let resp = label_service::list_labels(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/labels",
    request_body = NewLabel,
    responses(
        (status = 200, description = "Custom label created", body = ApiResponse<Label>),
        (status = 409, description = "Color already used by another label"),
        (status = 422, description = "Invalid name or color")
    ),
    tag = "Labels"
)]
pub async fn create_label(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewLabel>,
) -> AppResult<Json<ApiResponse<Label>>> {
    let resp = label_service::create_label(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/labels/{id}",
    params(("id" = String, Path, description = "Label ID")),
    responses(
        (status = 200, description = "Custom label deleted", body = ApiResponse<Label>),
        (status = 400, description = "Predefined labels cannot be deleted")
    ),
    tag = "Labels"
)]
pub async fn delete_label(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Label>>> {
    let resp = label_service::delete_label(&state, &user, &id).await?;
    Ok(Json(resp))
}
