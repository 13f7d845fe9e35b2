use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub storage: String,
    pub storage_ready: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    security(()),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let storage_ready = match state.storage.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "storage readiness check failed");
            false
        }
    };
    let data = HealthData {
        status: if storage_ready { "ok" } else { "degraded" }.to_string(),
        storage: state.storage.backend_name().to_string(),
        storage_ready,
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
