mod common;

use std::time::Duration;

use arreglio_admin::{
    config::AppConfig,
    dto::team::CreateMemberRequest,
    error::AppError,
    services::team_service,
    state::AppState,
    storage::Storage,
};
use axum::http::StatusCode;
use serde_json::json;

use common::{SECRET, app, bearer, send, staff, test_state};

fn new_member(email: &str) -> CreateMemberRequest {
    CreateMemberRequest {
        name: "Nuria Vidal".into(),
        email: email.into(),
        phone: "+34 600 000 000".into(),
        role: "Technician".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn duplicate_submission_while_saving_is_a_conflict() {
    let mut config = AppConfig::local(SECRET);
    config.simulated_latency = Duration::from_millis(100);
    let state = AppState::load(config, Storage::in_memory()).await.unwrap();
    let user = staff();

    let (first, second) = tokio::join!(
        team_service::create_member(&state, &user, new_member("nuria@arreglio.com")),
        team_service::create_member(&state, &user, new_member("NURIA@arreglio.com ")),
    );
    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(state.team.read().await.members().len(), 5);

    // The key is released once the first save finishes.
    assert!(!state.in_flight.is_pending("member:nuria@arreglio.com"));
}

#[tokio::test]
async fn invalid_member_reports_each_field() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let (status, body) = send(
        &app(&state),
        "POST",
        "/api/team",
        Some(&token),
        Some(json!({ "name": " ", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &body["data"]["fields"];
    for field in ["name", "email", "phone", "role"] {
        assert!(fields[field].is_string(), "missing error for {field}");
    }
}

#[tokio::test]
async fn members_are_searchable_and_paginated() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/team",
        Some(&token),
        Some(json!({
            "name": "Nuria Vidal",
            "email": "nuria@arreglio.com",
            "phone": "+34 600 000 000",
            "role": "Technician"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "5");
    assert_eq!(body["data"]["status"], "active");

    let (_, body) = send(&app, "GET", "/api/team?q=nuria", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 1);

    let (_, body) = send(&app, "GET", "/api/team?page=2&per_page=2", Some(&token), None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 5);
}
