use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::Notification, stores::header::Language};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub items: Vec<Notification>,
    /// Unread across all categories, for the bell badge.
    pub unread_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllRead {
    pub updated: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LanguageList {
    pub items: Vec<Language>,
    pub current: Language,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetLanguageRequest {
    pub code: String,
}
