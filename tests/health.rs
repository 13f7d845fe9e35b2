mod common;

use arreglio_admin::routes::health::health_check;
use axum::extract::State;

#[tokio::test]
async fn health_check_reports_storage_backend() {
    let state = common::test_state().await;
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.storage, "memory");
    assert!(data.storage_ready);
}
