use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus};

/// Create-order form. Every field defaults to empty so missing inputs surface as field errors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub device: String,
    pub description: String,
    pub assigned_to: String,
    pub total: Option<f64>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub device: Option<String>,
    pub description: Option<String>,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MoveVia {
    Drag,
    Menu,
}

impl MoveVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveVia::Drag => "drag",
            MoveVia::Menu => "menu",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveOrderRequest {
    pub status: String,
    pub via: Option<MoveVia>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardColumn {
    pub status: OrderStatus,
    pub title: String,
    pub count: usize,
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
    pub total: usize,
}
