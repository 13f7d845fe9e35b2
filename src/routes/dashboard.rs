use axum::{Json, extract::State};

use crate::{
    dto::dashboard::DashboardSummary, error::AppResult, middleware::auth::AuthUser,
    response::ApiResponse, services::dashboard_service, state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Workshop summary", body = ApiResponse<DashboardSummary>)),
    tag = "Dashboard"
)]
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let resp = dashboard_service::summary(&state).await?;
    Ok(Json(resp))
}
