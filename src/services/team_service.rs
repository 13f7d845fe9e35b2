use chrono::Utc;
use serde_json::json;

use crate::{
    activity::log_activity,
    dto::team::{CreateMemberRequest, MemberList, UpdateMemberRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, TeamMember},
    response::{ApiResponse, Meta},
    routes::params::MemberQuery,
    services::simulate_latency,
    state::AppState,
    stores::team::MemberFilter,
};

pub async fn list_members(
    state: &AppState,
    query: MemberQuery,
) -> AppResult<ApiResponse<MemberList>> {
    let filter = MemberFilter {
        q: query.q.clone(),
        role: query.role.clone(),
        status: query.status,
    };
    let members = state.team.read().await.search_members(&filter);
    let (items, meta) = query.pagination().apply(members);
    Ok(ApiResponse::success("Ok", MemberList { items }, Some(meta)))
}

pub async fn get_member(state: &AppState, id: &str) -> AppResult<ApiResponse<TeamMember>> {
    let member = state
        .team
        .read()
        .await
        .member(id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", member, None))
}

pub async fn create_member(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMemberRequest,
) -> AppResult<ApiResponse<TeamMember>> {
    let _guard = state
        .in_flight
        .begin(format!("member:{}", payload.email.trim().to_lowercase()))?;
    simulate_latency(state).await;

    let member = state
        .edit_team(|team| team.add_member(payload, Utc::now()))
        .await?;

    log_activity(
        state,
        &user.email,
        "member.created",
        None,
        format!("Team member {} added", member.name),
        Some(json!({ "member_id": member.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Team member added successfully",
        member,
        Some(Meta::empty()),
    ))
}

pub async fn update_member(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateMemberRequest,
) -> AppResult<ApiResponse<TeamMember>> {
    simulate_latency(state).await;

    let member = state
        .edit_team(|team| team.update_member(id, payload, Utc::now()))
        .await?;

    log_activity(
        state,
        &user.email,
        "member.updated",
        None,
        format!("Team member {} updated", member.name),
        Some(json!({ "member_id": member.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Team member updated successfully",
        member,
        Some(Meta::empty()),
    ))
}

pub async fn delete_member(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<TeamMember>> {
    let (member, released) = state
        .edit_team(|team| {
            let held: Vec<String> = team
                .orders()
                .iter()
                .filter(|o| o.assigned_to.as_deref() == Some(id))
                .map(|o| o.id.clone())
                .collect();
            Ok((team.delete_member(id)?, held))
        })
        .await?;

    for order_id in &released {
        log_activity(
            state,
            &user.email,
            "order.unassigned",
            Some(order_id),
            format!("Unassigned from {} (member removed)", member.name),
            None,
        )
        .await;
    }
    log_activity(
        state,
        &user.email,
        "member.deleted",
        None,
        format!("Team member {} removed", member.name),
        Some(json!({ "member_id": member.id, "released_orders": released })),
    )
    .await;

    Ok(ApiResponse::success(
        "Team member deleted",
        member,
        Some(Meta::empty()),
    ))
}

pub async fn assign_order(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    member_id: &str,
) -> AppResult<ApiResponse<Order>> {
    let (order, member_name) = state
        .edit_team(|team| {
            let order = team.assign_order(order_id, member_id)?;
            let name = team
                .member(member_id)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            Ok((order, name))
        })
        .await?;

    log_activity(
        state,
        &user.email,
        "order.assigned",
        Some(order_id),
        format!("Assigned to {member_name}"),
        Some(json!({ "member_id": member_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Order assigned",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn unassign_order(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .edit_team(|team| team.unassign_order(order_id))
        .await?;

    log_activity(
        state,
        &user.email,
        "order.unassigned",
        Some(order_id),
        "Unassigned",
        None,
    )
    .await;

    Ok(ApiResponse::success(
        "Order unassigned",
        order,
        Some(Meta::empty()),
    ))
}
