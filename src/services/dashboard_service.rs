use crate::{
    dto::dashboard::{DashboardSummary, StatusCount},
    error::AppResult,
    models::MemberStatus,
    response::ApiResponse,
    state::AppState,
};

pub async fn summary(state: &AppState) -> AppResult<ApiResponse<DashboardSummary>> {
    let (orders_by_status, total_orders, unassigned_orders, active_members, revenue) = {
        let team = state.team.read().await;
        let board = team.board();
        let by_status = board
            .columns
            .into_iter()
            .map(|c| StatusCount {
                status: c.status,
                title: c.title,
                count: c.count,
            })
            .collect();
        let unassigned = team
            .orders()
            .iter()
            .filter(|o| o.assigned_to.is_none())
            .count();
        let active = team
            .members()
            .iter()
            .filter(|m| m.status == MemberStatus::Active)
            .count();
        let revenue: f64 = team.orders().iter().map(|o| o.total).sum();
        (by_status, board.total, unassigned, active, revenue)
    };
    let unread_notifications = state.header.read().await.unread_count();
    let running_timers = state.workspaces.read().await.running_timers();

    Ok(ApiResponse::success(
        "Ok",
        DashboardSummary {
            orders_by_status,
            total_orders,
            unassigned_orders,
            active_members,
            unread_notifications,
            running_timers,
            revenue,
        },
        None,
    ))
}
