use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Label, Order},
    stores::workspace::{
        Attachment, CostSection, OrderWorkspace, RequestStatus, TimerState, WorkTimer,
        format_duration,
    },
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub order: Order,
    pub workspace: OrderWorkspace,
    /// Attached labels, resolved against the registry.
    pub labels: Vec<Label>,
    pub timer: TimerView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub state: TimerState,
    pub elapsed_secs: i64,
    pub display: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerView {
    pub fn at(timer: &WorkTimer, now: DateTime<Utc>) -> Self {
        let elapsed = timer.elapsed_secs(now);
        Self {
            state: timer.state,
            elapsed_secs: elapsed,
            display: format_duration(elapsed),
            started_at: timer.started_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Stop,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TimerActionRequest {
    pub action: TimerAction,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CostView {
    pub cost: CostSection,
    pub subtotal: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DescriptionRequest {
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogRequest {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerRequestPayload {
    pub title: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestStatusPayload {
    pub status: RequestStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachLabelRequest {
    pub label_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentList {
    pub items: Vec<Attachment>,
}

/// A file read from a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw attachment bytes ready to be streamed back.
#[derive(Debug)]
pub struct AttachmentContent {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
