use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::OrderStatus;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub orders_by_status: Vec<StatusCount>,
    pub total_orders: usize,
    pub unassigned_orders: usize,
    pub active_members: usize,
    pub unread_notifications: usize,
    pub running_timers: usize,
    pub revenue: f64,
}
