use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Workflow stage of a repair order. Board columns are rendered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    DropByCustomer,
    Received,
    WorkInProgress,
    WaitingCustomerReply,
    WaitingForParts,
    PickupByCustomer,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::DropByCustomer,
        OrderStatus::Received,
        OrderStatus::WorkInProgress,
        OrderStatus::WaitingCustomerReply,
        OrderStatus::WaitingForParts,
        OrderStatus::PickupByCustomer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropByCustomer => "drop_by_customer",
            Self::Received => "received",
            Self::WorkInProgress => "work_in_progress",
            Self::WaitingCustomerReply => "waiting_customer_reply",
            Self::WaitingForParts => "waiting_for_parts",
            Self::PickupByCustomer => "pickup_by_customer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DropByCustomer => "Drop by customer",
            Self::Received => "Received",
            Self::WorkInProgress => "Work in progress",
            Self::WaitingCustomerReply => "Waiting customer reply",
            Self::WaitingForParts => "Waiting for parts",
            Self::PickupByCustomer => "Pickup by customer",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid order status: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Inactive,
    OnLeave,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::OnLeave => "on_leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub department: String,
    pub status: MemberStatus,
    pub avatar: Option<String>,
    pub join_date: NaiveDate,
    pub last_active: DateTime<Utc>,
    pub assigned_orders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default)]
    pub device: String,
    pub description: String,
    pub status: OrderStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub category: String,
    pub service_name: String,
    pub description: String,
    pub price: f64,
    pub vat_rate: f64,
    pub delivery_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Order,
    Team,
    System,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: NotificationCategory,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: Priority,
}

/// Colored tag attached to orders. `color` is the hex value labels are kept unique on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub background: String,
    pub custom: bool,
}

/// Staff login. Persisted under the `accounts` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys_parse_and_print() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_uses_camel_case_keys() {
        let order = Order {
            id: "18".into(),
            customer_name: "Ana".into(),
            customer_email: "ana@example.com".into(),
            customer_phone: "600111222".into(),
            device: "iPhone 12".into(),
            description: "Broken screen".into(),
            status: OrderStatus::WorkInProgress,
            assigned_to: Some("1".into()),
            created_at: Utc::now(),
            total: 120.0,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerName"], "Ana");
        assert_eq!(json["assignedTo"], "1");
        assert_eq!(json["status"], "work_in_progress");
    }
}
