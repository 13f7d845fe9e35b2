mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, bearer, send, test_state};

#[tokio::test]
async fn summary_reflects_board_and_header_state() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalOrders"], 5);
    assert_eq!(body["data"]["ordersByStatus"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["unreadNotifications"], 3);
    assert_eq!(body["data"]["runningTimers"], 0);

    send(&app, "POST", "/api/orders/22/timer", Some(&token), Some(json!({ "action": "start" }))).await;
    let (status, body) = send(&app, "POST", "/api/notifications/read-all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 3);

    let (_, body) = send(&app, "GET", "/api/dashboard", Some(&token), None).await;
    assert_eq!(body["data"]["unreadNotifications"], 0);
    assert_eq!(body["data"]["runningTimers"], 1);
}

#[tokio::test]
async fn notifications_can_be_read_and_dismissed() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, body) = send(&app, "GET", "/api/notifications?unread=true", Some(&token), None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "PATCH", "/api/notifications/n1/read", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["read"], true);

    let (_, body) = send(&app, "GET", "/api/notifications", Some(&token), None).await;
    assert_eq!(body["data"]["unreadCount"], 2);

    let (status, _) = send(&app, "DELETE", "/api/notifications/n1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/api/notifications/n1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn language_switch_accepts_known_codes_only() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, body) = send(&app, "GET", "/api/languages", Some(&token), None).await;
    assert_eq!(body["data"]["current"]["code"], "en");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/languages/current",
        Some(&token),
        Some(json!({ "code": "ES" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Español");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/languages/current",
        Some(&token),
        Some(json!({ "code": "xx" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_catalog_filters_and_validates() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, body) = send(&app, "GET", "/api/services?category=Laptops", Some(&token), None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/services/categories", Some(&token), None).await;
    assert_eq!(body["data"]["items"], json!(["Smartphones", "Laptops", "Tablets"]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/services",
        Some(&token),
        Some(json!({ "category": "Consoles", "serviceName": "", "price": -5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["fields"]["serviceName"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/services",
        Some(&token),
        Some(json!({ "category": "Consoles", "serviceName": "HDMI port", "price": 59.0, "vatRate": 21.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/services/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/services/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
