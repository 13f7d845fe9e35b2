//! Per-order workspace: the sections of the order detail page, its timer,
//! attachments and labels. Workspaces live in memory only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostSection {
    pub items: Vec<CostItem>,
    pub discount: f64,
}

impl CostSection {
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum()
    }

    /// Never negative, even when the discount exceeds the subtotal.
    pub fn total(&self) -> f64 {
        (self.subtotal() - self.discount).max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub device: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub accessories: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub id: String,
    pub title: String,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// Manual count-up timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimer {
    pub state: TimerState,
    pub accumulated_secs: i64,
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for WorkTimer {
    fn default() -> Self {
        Self {
            state: TimerState::Stopped,
            accumulated_secs: 0,
            started_at: None,
        }
    }
}

impl WorkTimer {
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        let running = match (self.state, self.started_at) {
            (TimerState::Running, Some(started)) => (now - started).num_seconds().max(0),
            _ => 0,
        };
        self.accumulated_secs + running
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.state == TimerState::Running {
            return Err(AppError::BadRequest("Timer is already running".into()));
        }
        self.state = TimerState::Running;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.state != TimerState::Running {
            return Err(AppError::BadRequest("Timer is not running".into()));
        }
        self.accumulated_secs = self.elapsed_secs(now);
        self.state = TimerState::Paused;
        self.started_at = None;
        Ok(())
    }

    /// Resets the timer and returns the time it had counted.
    pub fn stop(&mut self, now: DateTime<Utc>) -> i64 {
        let total = self.elapsed_secs(now);
        *self = WorkTimer::default();
        total
    }
}

pub fn format_duration(secs: i64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
    pub is_image: bool,
    /// Inline URL for image previews.
    pub preview_url: Option<String>,
    pub download_url: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWorkspace {
    pub order_id: String,
    pub cost: CostSection,
    pub info: DeviceInfo,
    pub description: String,
    pub log: Vec<LogEntry>,
    pub comments: Vec<Comment>,
    pub requests: Vec<CustomerRequest>,
    pub attachments: Vec<Attachment>,
    pub labels: Vec<String>,
    pub timer: WorkTimer,
    #[serde(skip)]
    files: HashMap<String, Vec<u8>>,
}

impl OrderWorkspace {
    pub fn new(order_id: &str, description: &str, device: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            description: description.to_string(),
            info: DeviceInfo {
                device: device.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn append_log(&mut self, actor: &str, message: impl Into<String>, now: DateTime<Utc>) {
        self.log.push(LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            actor: actor.to_string(),
            message: message.into(),
        });
    }

    /// Replaces the cost lines and returns the new total.
    pub fn set_cost(&mut self, mut cost: CostSection) -> AppResult<f64> {
        let mut v = Validator::new();
        for (index, item) in cost.items.iter().enumerate() {
            v.require(
                &format!("items[{index}].description"),
                &item.description,
                "Description is required",
            );
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                v.add(&format!("items[{index}].unitPrice"), "Price cannot be negative");
            }
        }
        if !cost.discount.is_finite() || cost.discount < 0.0 {
            v.add("discount", "Discount cannot be negative");
        }
        if !cost.subtotal().is_finite() || !cost.total().is_finite() {
            v.add("items", "Cost total is too large");
        }
        v.finish()?;

        for item in cost.items.iter_mut().filter(|item| item.id.is_empty()) {
            item.id = Uuid::new_v4().to_string();
        }
        self.cost = cost;
        Ok(self.cost.total())
    }

    pub fn add_comment(&mut self, author: &str, body: &str, now: DateTime<Utc>) -> AppResult<Comment> {
        let mut v = Validator::new();
        v.require("body", body, "Comment cannot be empty");
        v.finish()?;
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            body: body.trim().to_string(),
            created_at: now,
        };
        self.comments.push(comment.clone());
        Ok(comment)
    }

    pub fn delete_comment(&mut self, id: &str) -> AppResult<Comment> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(self.comments.remove(index))
    }

    pub fn add_request(
        &mut self,
        title: &str,
        details: &str,
        now: DateTime<Utc>,
    ) -> AppResult<CustomerRequest> {
        let mut v = Validator::new();
        v.require("title", title, "Title is required");
        v.finish()?;
        let request = CustomerRequest {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            details: details.trim().to_string(),
            status: RequestStatus::Pending,
            created_at: now,
        };
        self.requests.push(request.clone());
        Ok(request)
    }

    pub fn set_request_status(
        &mut self,
        id: &str,
        status: RequestStatus,
    ) -> AppResult<CustomerRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)?;
        request.status = status;
        Ok(request.clone())
    }

    pub fn add_attachment(
        &mut self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        now: DateTime<Utc>,
    ) -> AppResult<Attachment> {
        if file_name.trim().is_empty() {
            return Err(AppError::BadRequest("File name is required".into()));
        }
        if bytes.is_empty() {
            return Err(AppError::BadRequest(format!("{file_name} is empty")));
        }
        let id = Uuid::new_v4().to_string();
        let base = format!("/api/orders/{}/attachments/{id}", self.order_id);
        let is_image = content_type.starts_with("image/");
        let attachment = Attachment {
            id: id.clone(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
            uploaded_at: now,
            is_image,
            preview_url: is_image.then(|| format!("{base}/content")),
            download_url: format!("{base}/download"),
        };
        self.files.insert(id, bytes);
        self.attachments.push(attachment.clone());
        Ok(attachment)
    }

    pub fn attachment(&self, id: &str) -> AppResult<(&Attachment, &[u8])> {
        let attachment = self
            .attachments
            .iter()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        let bytes = self.files.get(id).ok_or(AppError::NotFound)?;
        Ok((attachment, bytes.as_slice()))
    }

    /// Deleting requires the caller to have confirmed the action.
    pub fn delete_attachment(&mut self, id: &str, confirmed: bool) -> AppResult<Attachment> {
        let index = self
            .attachments
            .iter()
            .position(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        if !confirmed {
            return Err(AppError::BadRequest(
                "Deleting an attachment must be confirmed".into(),
            ));
        }
        self.files.remove(id);
        Ok(self.attachments.remove(index))
    }

    /// Returns false when the label was already attached.
    pub fn attach_label(&mut self, label_id: &str) -> bool {
        if self.labels.iter().any(|l| l == label_id) {
            return false;
        }
        self.labels.push(label_id.to_string());
        true
    }

    pub fn detach_label(&mut self, label_id: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label_id);
        before != self.labels.len()
    }
}

#[derive(Debug, Default)]
pub struct Workspaces {
    by_order: HashMap<String, OrderWorkspace>,
}

impl Workspaces {
    pub fn get(&self, order_id: &str) -> Option<&OrderWorkspace> {
        self.by_order.get(order_id)
    }

    pub fn get_mut(&mut self, order_id: &str) -> Option<&mut OrderWorkspace> {
        self.by_order.get_mut(order_id)
    }

    /// Returns the workspace, creating it from the order's current fields on first use.
    pub fn open(&mut self, order_id: &str, description: &str, device: &str) -> &mut OrderWorkspace {
        self.by_order
            .entry(order_id.to_string())
            .or_insert_with(|| OrderWorkspace::new(order_id, description, device))
    }

    pub fn close(&mut self, order_id: &str) -> Option<OrderWorkspace> {
        self.by_order.remove(order_id)
    }

    pub fn detach_label_everywhere(&mut self, label_id: &str) {
        for workspace in self.by_order.values_mut() {
            workspace.detach_label(label_id);
        }
    }

    pub fn running_timers(&self) -> usize {
        self.by_order
            .values()
            .filter(|w| w.timer.state == TimerState::Running)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn timer_counts_across_pauses_and_resets_on_stop() {
        let t0 = Utc::now();
        let mut timer = WorkTimer::default();
        timer.start(t0).unwrap();
        assert!(timer.start(t0).is_err());
        timer.pause(t0 + Duration::seconds(90)).unwrap();
        assert_eq!(timer.elapsed_secs(t0 + Duration::seconds(500)), 90);

        timer.start(t0 + Duration::seconds(600)).unwrap();
        assert_eq!(timer.elapsed_secs(t0 + Duration::seconds(630)), 120);

        let total = timer.stop(t0 + Duration::seconds(660));
        assert_eq!(total, 150);
        assert_eq!(timer, WorkTimer::default());
        assert_eq!(format_duration(total), "00:02:30");
    }

    #[test]
    fn pausing_an_idle_timer_fails() {
        let mut timer = WorkTimer::default();
        assert!(timer.pause(Utc::now()).is_err());
    }

    #[test]
    fn cost_total_applies_discount() {
        let mut ws = OrderWorkspace::new("18", "", "");
        let total = ws
            .set_cost(CostSection {
                items: vec![
                    CostItem {
                        description: "Screen".into(),
                        quantity: 1,
                        unit_price: 120.0,
                        ..Default::default()
                    },
                    CostItem {
                        description: "Labour".into(),
                        quantity: 2,
                        unit_price: 20.0,
                        ..Default::default()
                    },
                ],
                discount: 10.0,
            })
            .unwrap();
        assert_eq!(total, 150.0);
        assert!(ws.cost.items.iter().all(|item| !item.id.is_empty()));
    }

    #[test]
    fn overflowing_cost_is_rejected() {
        let mut ws = OrderWorkspace::new("18", "", "");
        let err = ws
            .set_cost(CostSection {
                items: vec![CostItem {
                    description: "Board".into(),
                    quantity: 2,
                    unit_price: 1e308,
                    ..Default::default()
                }],
                discount: 0.0,
            })
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("items"));
        assert!(ws.cost.items.is_empty());
    }

    #[test]
    fn attachment_delete_needs_confirmation() {
        let mut ws = OrderWorkspace::new("18", "", "");
        let photo = ws
            .add_attachment("front.png", "image/png", vec![1, 2, 3], Utc::now())
            .unwrap();
        assert!(photo.is_image);
        assert_eq!(
            photo.preview_url.as_deref(),
            Some(format!("/api/orders/18/attachments/{}/content", photo.id).as_str())
        );

        assert!(matches!(
            ws.delete_attachment(&photo.id, false),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(ws.attachments.len(), 1);

        ws.delete_attachment(&photo.id, true).unwrap();
        assert!(ws.attachment(&photo.id).is_err());
    }

    #[test]
    fn documents_have_no_preview() {
        let mut ws = OrderWorkspace::new("18", "", "");
        let pdf = ws
            .add_attachment("quote.pdf", "application/pdf", vec![0x25], Utc::now())
            .unwrap();
        assert!(!pdf.is_image);
        assert!(pdf.preview_url.is_none());
        let (_, bytes) = ws.attachment(&pdf.id).unwrap();
        assert_eq!(bytes, &[0x25]);
    }

    #[test]
    fn labels_attach_once() {
        let mut ws = OrderWorkspace::new("18", "", "");
        assert!(ws.attach_label("urgent"));
        assert!(!ws.attach_label("urgent"));
        assert!(ws.detach_label("urgent"));
        assert!(ws.labels.is_empty());
    }
}
