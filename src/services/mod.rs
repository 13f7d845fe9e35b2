use crate::state::AppState;

pub mod auth_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod header_service;
pub mod label_service;
pub mod order_service;
pub mod team_service;
pub mod website_service;
pub mod workspace_service;

/// Sleeps for the configured latency of slow operations (form submits, saves).
pub(crate) async fn simulate_latency(state: &AppState) {
    let latency = state.config.simulated_latency;
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
