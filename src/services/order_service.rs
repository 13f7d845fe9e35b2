use chrono::Utc;
use serde_json::json;

use crate::{
    activity::log_activity,
    dto::orders::{Board, CreateOrderRequest, MoveOrderRequest, MoveVia, OrderList, UpdateOrderRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::simulate_latency,
    state::{AppState, commit_team},
    storage::keys,
    stores::{TeamStore, team::OrderFilter},
};

fn submission_key(user: &AuthUser, payload: &CreateOrderRequest) -> String {
    format!(
        "order:{}:{}",
        user.email,
        payload.description.trim().to_lowercase()
    )
}

/// Moves the order parked under `newOrder`, if any, onto the board and clears the key.
/// An id taken in the meantime is replaced with a fresh one.
async fn take_pending_order(state: &AppState, team: &mut TeamStore) -> AppResult<Option<Order>> {
    let Some(mut pending) = state.storage.load_json::<Order>(keys::NEW_ORDER).await? else {
        return Ok(None);
    };

    let already_inserted = team.order(&pending.id).is_some_and(|existing| {
        existing.created_at == pending.created_at && existing.description == pending.description
    });
    if already_inserted {
        tracing::debug!(order_id = %pending.id, "pending order already on the board");
        state.storage.remove_item(keys::NEW_ORDER).await?;
        return Ok(None);
    }

    let parked_id = pending.id.clone();
    let order = commit_team(&state.storage, team, |draft| {
        draft.note_order_id(&pending.id);
        if draft.order(&pending.id).is_some() {
            pending.id = draft.reserve_order_id();
        }
        draft.insert_order(pending)
    })
    .await?;
    state.storage.remove_item(keys::NEW_ORDER).await?;

    if order.id != parked_id {
        tracing::warn!(parked = %parked_id, order_id = %order.id, "pending order id was taken, renumbered");
    }
    tracing::info!(order_id = %order.id, "pending order added to the board");
    Ok(Some(order))
}

async fn log_created(state: &AppState, user: &AuthUser, order: &Order) {
    log_activity(
        state,
        &user.email,
        "order.created",
        Some(&order.id),
        "Order created",
        Some(json!({ "assigned_to": order.assigned_to })),
    )
    .await;
}

pub async fn board(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Board>> {
    let taken = {
        let mut team = state.team.write().await;
        take_pending_order(state, &mut team).await?
    };
    if let Some(order) = taken {
        log_created(state, user, &order).await;
    }

    let board = state.team.read().await.board();
    Ok(ApiResponse::success("Ok", board, None))
}

/// Board form: the order lands on the board right away.
pub async fn create_board_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let _guard = state.in_flight.begin(submission_key(user, &payload))?;
    simulate_latency(state).await;

    let order = state
        .edit_team(|team| team.create_order(payload, Utc::now()))
        .await?;
    log_created(state, user, &order).await;

    Ok(ApiResponse::success(
        "Order created successfully",
        order,
        Some(Meta::empty()),
    ))
}

/// Create-order page: the order is parked under `newOrder` until the board is next read.
/// An order still parked from an earlier submission goes onto the board first.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let _guard = state.in_flight.begin(submission_key(user, &payload))?;
    simulate_latency(state).await;

    let (earlier, order) = {
        let mut team = state.team.write().await;
        team.validate_new_order(&payload)?;
        let earlier = take_pending_order(state, &mut team).await?;
        let order = team.build_order(payload, Utc::now());
        state.storage.save_json(keys::NEW_ORDER, &order).await?;
        (earlier, order)
    };
    tracing::info!(order_id = %order.id, by = %user.email, "order parked for the board");
    if let Some(earlier) = earlier {
        log_created(state, user, &earlier).await;
    }

    Ok(ApiResponse::success(
        "Order created successfully",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn move_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: MoveOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let status: OrderStatus = payload.status.parse().map_err(AppError::BadRequest)?;
    let via = payload.via.unwrap_or(MoveVia::Menu);

    let (previous, order) = state
        .edit_team(|team| team.set_order_status(id, status))
        .await?;

    if previous != status {
        log_activity(
            state,
            &user.email,
            "order.moved",
            Some(id),
            format!("Moved from {} to {} via {}", previous.title(), status.title(), via.as_str()),
            Some(json!({ "from": previous.as_str(), "to": status.as_str(), "via": via.as_str() })),
        )
        .await;
    }

    Ok(ApiResponse::success(
        format!("Order moved to {}", status.title()),
        order,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => Some(s.parse::<OrderStatus>().map_err(AppError::BadRequest)?),
        None => None,
    };
    let filter = OrderFilter {
        q: query.q.clone(),
        status,
        assigned_to: query.assigned_to.clone().filter(|a| !a.is_empty()),
    };

    let mut orders = state.team.read().await.search_orders(&filter);
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => orders.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let (items, meta) = query.pagination().apply(orders);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = state
        .team
        .read()
        .await
        .order(id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", order, None))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = state.edit_team(|team| team.update_order(id, payload)).await?;

    log_activity(
        state,
        &user.email,
        "order.updated",
        Some(id),
        "Order details updated",
        None,
    )
    .await;

    Ok(ApiResponse::success("Updated", order, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Order>> {
    let order = state.edit_team(|team| team.delete_order(id)).await?;
    state.workspaces.write().await.close(id);

    log_activity(
        state,
        &user.email,
        "order.deleted",
        None,
        format!("Order {id} deleted"),
        Some(json!({ "order_id": id })),
    )
    .await;

    Ok(ApiResponse::success("Deleted", order, Some(Meta::empty())))
}
