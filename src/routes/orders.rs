use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};

use crate::{
    dto::{
        orders::{Board, CreateOrderRequest, MoveOrderRequest, OrderList, UpdateOrderRequest},
        team::AssignOrderRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::{params::OrderListQuery, workspace},
    services::{order_service, team_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route("/{id}/status", patch(move_order))
        .route("/{id}/assignee", put(assign_order).delete(unassign_order))
        .merge(workspace::router())
}

pub fn board_router() -> Router<AppState> {
    Router::new()
        .route("/", get(board))
        .route("/orders", axum::routing::post(create_board_order))
}

#[utoipa::path(
    get,
    path = "/api/board",
    responses(
        (status = 200, description = "Orders grouped into the six workflow columns", body = ApiResponse<Board>)
    ),
    tag = "Board"
)]
pub async fn board(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Board>>> {
    let resp = order_service::board(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/board/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order added to the board", body = ApiResponse<Order>),
        (status = 409, description = "Same submission already in flight"),
        (status = 422, description = "One message per failing field")
    ),
    tag = "Board"
)]
pub async fn create_board_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_board_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Search orders", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status")
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created; shown on the board at its next read", body = ApiResponse<Order>),
        (status = 409, description = "Same submission already in flight"),
        (status = 422, description = "One message per failing field")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::delete_order(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(("id" = String, Path, description = "Order ID")),
    request_body = MoveOrderRequest,
    responses(
        (status = 200, description = "Order moved", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn move_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<MoveOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::move_order(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/assignee",
    params(("id" = String, Path, description = "Order ID")),
    request_body = AssignOrderRequest,
    responses(
        (status = 200, description = "Order assigned", body = ApiResponse<Order>),
        (status = 404, description = "Order or member not found")
    ),
    tag = "Orders"
)]
pub async fn assign_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AssignOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = team_service::assign_order(&state, &user, &id, &payload.member_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/assignee",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order unassigned", body = ApiResponse<Order>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn unassign_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = team_service::unassign_order(&state, &user, &id).await?;
    Ok(Json(resp))
}
