mod common;

use arreglio_admin::{
    models::{Order, TeamMember},
    state::load_team,
    storage::keys,
};
use axum::http::StatusCode;
use serde_json::json;

use common::{app, bearer, send, state_with, test_state};

fn valid_order() -> serde_json::Value {
    json!({
        "customerName": "Laura Pons",
        "customerEmail": "laura@example.com",
        "customerPhone": "600000001",
        "device": "Galaxy A52",
        "description": "Does not charge",
        "assignedTo": "2"
    })
}

#[tokio::test]
async fn api_requires_a_token() {
    let state = test_state().await;
    let app = app(&state);

    let (status, _) = send(&app, "GET", "/api/board", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/board", Some("Bearer nonsense"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_returns_json_not_found() {
    let state = test_state().await;
    let (status, body) = send(&app(&state), "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nowhere");
}

#[tokio::test]
async fn board_lists_six_columns_in_workflow_order() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let (status, body) = send(&app(&state), "GET", "/api/board", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let columns = body["data"]["columns"].as_array().unwrap();
    let keys: Vec<&str> = columns
        .iter()
        .map(|c| c["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        [
            "drop_by_customer",
            "received",
            "work_in_progress",
            "waiting_customer_reply",
            "waiting_for_parts",
            "pickup_by_customer"
        ]
    );
    assert_eq!(body["data"]["total"], 5);
}

#[tokio::test]
async fn invalid_board_order_reports_every_field_and_adds_nothing() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) =
        send(&app, "POST", "/api/board/orders", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = body["data"]["fields"].as_object().unwrap();
    for field in [
        "description",
        "assignedTo",
        "customerName",
        "customerEmail",
        "customerPhone",
    ] {
        assert!(fields.contains_key(field), "missing error for {field}");
    }

    let mut payload = valid_order();
    payload["customerEmail"] = json!("laura@example");
    let (status, body) =
        send(&app, "POST", "/api/board/orders", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["fields"]["customerEmail"], "Email is not valid");

    assert_eq!(state.team.read().await.orders().len(), 5);
}

#[tokio::test]
async fn board_order_lands_in_first_column_and_is_persisted() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) =
        send(&app, "POST", "/api/board/orders", Some(&token), Some(valid_order())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["id"], "23");
    assert_eq!(body["data"]["assignedTo"], "2");

    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    let first = &board["data"]["columns"][0];
    assert_eq!(first["count"], 2);
    assert!(
        first["orders"]
            .as_array()
            .unwrap()
            .iter()
            .any(|o| o["id"] == "23")
    );

    let orders: Vec<Order> = state.storage.load_json(keys::ORDERS).await.unwrap().unwrap();
    assert!(orders.iter().any(|o| o.id == "23"));
    let members: Vec<TeamMember> = state
        .storage
        .load_json(keys::TEAM_MEMBERS)
        .await
        .unwrap()
        .unwrap();
    let two = members.iter().find(|m| m.id == "2").unwrap();
    assert!(two.assigned_orders.contains(&"23".to_string()));
}

#[tokio::test]
async fn create_order_page_hands_off_through_new_order_key() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(&app, "POST", "/api/orders", Some(&token), Some(valid_order())).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Parked, not yet on the board.
    assert!(state.storage.get_item(keys::NEW_ORDER).await.unwrap().is_some());
    assert!(state.team.read().await.order(&id).is_none());

    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    assert_eq!(board["data"]["total"], 6);
    assert!(state.storage.get_item(keys::NEW_ORDER).await.unwrap().is_none());
    assert_eq!(
        state.team.read().await.order(&id).unwrap().assigned_to.as_deref(),
        Some("2")
    );

    // A second read does not duplicate it.
    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    assert_eq!(board["data"]["total"], 6);
}

fn board_ids(board: &serde_json::Value) -> Vec<String> {
    board["data"]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|column| column["orders"].as_array().unwrap().iter())
        .map(|order| order["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn parked_order_keeps_its_id_when_the_board_form_is_used_next() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, parked) = send(&app, "POST", "/api/orders", Some(&token), Some(valid_order())).await;
    let mut from_board = valid_order();
    from_board["description"] = json!("Cracked back glass");
    let (status, direct) = send(&app, "POST", "/api/board/orders", Some(&token), Some(from_board)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parked["data"]["id"], "23");
    assert_eq!(direct["data"]["id"], "24");

    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    assert_eq!(board["data"]["total"], 7);
    let ids = board_ids(&board);
    assert!(ids.contains(&"23".to_string()));
    assert!(ids.contains(&"24".to_string()));
    assert_eq!(
        state.team.read().await.order("23").unwrap().description,
        "Does not charge"
    );
}

#[tokio::test]
async fn second_page_order_moves_the_first_onto_the_board() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, first) = send(&app, "POST", "/api/orders", Some(&token), Some(valid_order())).await;
    let mut second = valid_order();
    second["description"] = json!("Speaker crackles");
    let (_, second) = send(&app, "POST", "/api/orders", Some(&token), Some(second)).await;
    assert_eq!(first["data"]["id"], "23");
    assert_eq!(second["data"]["id"], "24");

    // The first is on the board already, the second is parked.
    assert!(state.team.read().await.order("23").is_some());
    let parked: Order = state.storage.load_json(keys::NEW_ORDER).await.unwrap().unwrap();
    assert_eq!(parked.id, "24");

    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    assert_eq!(board["data"]["total"], 7);
}

#[tokio::test]
async fn parked_order_with_a_taken_id_is_renumbered() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (_, direct) = send(&app, "POST", "/api/board/orders", Some(&token), Some(valid_order())).await;
    assert_eq!(direct["data"]["id"], "23");

    // An order parked under the same id by another process.
    let mut parked = state.team.read().await.order("23").unwrap().clone();
    parked.description = "Battery swells".into();
    parked.created_at = parked.created_at + chrono::Duration::seconds(5);
    state.storage.save_json(keys::NEW_ORDER, &parked).await.unwrap();

    let (_, board) = send(&app, "GET", "/api/board", Some(&token), None).await;
    assert_eq!(board["data"]["total"], 7);
    let team = state.team.read().await;
    assert_eq!(team.order("23").unwrap().description, "Does not charge");
    assert_eq!(team.order("24").unwrap().description, "Battery swells");
    assert!(state.storage.get_item(keys::NEW_ORDER).await.unwrap().is_none());
}

#[tokio::test]
async fn moving_an_order_accepts_any_stage_and_logs_the_move() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/orders/20/status",
        Some(&token),
        Some(json!({ "status": "pickup_by_customer", "via": "drag" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pickup_by_customer");

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/orders/20/status",
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, workspace) = send(&app, "GET", "/api/orders/20/workspace", Some(&token), None).await;
    let log = workspace["data"]["workspace"]["log"].as_array().unwrap();
    assert!(
        log.iter()
            .any(|entry| entry["message"].as_str().unwrap().ends_with("via drag"))
    );
}

#[tokio::test]
async fn reassigning_order_18_moves_it_from_member_1_to_member_2() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/orders/18/assignee",
        Some(&token),
        Some(json!({ "memberId": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignedTo"], "2");

    let (_, one) = send(&app, "GET", "/api/team/1", Some(&token), None).await;
    assert!(
        !one["data"]["assignedOrders"]
            .as_array()
            .unwrap()
            .iter()
            .any(|id| id == "18")
    );
    let (_, two) = send(&app, "GET", "/api/team/2", Some(&token), None).await;
    let held = two["data"]["assignedOrders"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|id| *id == "18")
        .count();
    assert_eq!(held, 1);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/orders/18/assignee",
        Some(&token),
        Some(json!({ "memberId": "99" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_member_unassigns_its_orders_and_survives_reload() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, _) = send(&app, "DELETE", "/api/team/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let reloaded = load_team(&state.storage).await.unwrap();
    assert!(reloaded.member("1").is_none());
    for id in ["18", "21"] {
        assert_eq!(reloaded.order(id).unwrap().assigned_to, None);
    }

    let fresh = state_with(state.storage.clone()).await;
    assert_eq!(*fresh.team.read().await, reloaded);
}

#[tokio::test]
async fn order_search_filters_by_status_and_assignee() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "GET",
        "/api/orders?assigned_to=1&sort_order=asc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);

    let (_, body) = send(&app, "GET", "/api/orders?status=received", Some(&token), None).await;
    assert_eq!(body["data"]["items"][0]["id"], "21");

    let (status, _) = send(&app, "GET", "/api/orders?status=lost", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_order_removes_it_from_its_member() {
    let state = test_state().await;
    let token = bearer(&state, "staff");
    let app = app(&state);

    let (status, _) = send(&app, "DELETE", "/api/orders/21", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/orders/21", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let team = state.team.read().await;
    assert_eq!(team.member("1").unwrap().assigned_orders, vec!["18".to_string()]);
}
