use chrono::Utc;
use serde_json::json;

use crate::{
    activity::log_activity,
    dto::{
        orders::UpdateOrderRequest,
        workspace::{
            AttachmentContent, AttachmentList, CostView, TimerAction, TimerView, UploadedFile,
            WorkspaceView,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Label, Order},
    response::{ApiResponse, Meta},
    state::AppState,
    stores::workspace::{
        Attachment, Comment, CostSection, CustomerRequest, DeviceInfo, LogEntry, RequestStatus,
        format_duration,
    },
};

async fn find_order(state: &AppState, order_id: &str) -> AppResult<Order> {
    state
        .team
        .read()
        .await
        .order(order_id)
        .cloned()
        .ok_or(AppError::NotFound)
}

async fn resolve_labels(state: &AppState, ids: &[String]) -> Vec<Label> {
    let labels = state.labels.read().await;
    ids.iter().filter_map(|id| labels.get(id).cloned()).collect()
}

pub async fn get_workspace(
    state: &AppState,
    order_id: &str,
) -> AppResult<ApiResponse<WorkspaceView>> {
    let order = find_order(state, order_id).await?;
    let workspace = state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .clone();
    let labels = resolve_labels(state, &workspace.labels).await;
    let timer = TimerView::at(&workspace.timer, Utc::now());

    Ok(ApiResponse::success(
        "Ok",
        WorkspaceView {
            order,
            workspace,
            labels,
            timer,
        },
        None,
    ))
}

/// Replaces the cost lines and writes the recomputed total back to the order.
pub async fn set_cost(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    cost: CostSection,
) -> AppResult<ApiResponse<CostView>> {
    let order = find_order(state, order_id).await?;
    let mut workspace = state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .clone();
    let total = workspace.set_cost(cost)?;
    state
        .edit_team(|team| team.set_order_total(order_id, total))
        .await?;
    let cost = workspace.cost.clone();
    state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .cost = workspace.cost;

    log_activity(
        state,
        &user.email,
        "order.cost_updated",
        Some(order_id),
        format!("Cost updated, total {total:.2}"),
        Some(json!({ "total": total })),
    )
    .await;

    Ok(ApiResponse::success(
        "Cost saved",
        CostView {
            subtotal: cost.subtotal(),
            total,
            cost,
        },
        Some(Meta::empty()),
    ))
}

/// Saves the device section. A non-empty device name is mirrored onto the order.
pub async fn set_info(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    info: DeviceInfo,
) -> AppResult<ApiResponse<DeviceInfo>> {
    let order = find_order(state, order_id).await?;
    if !info.device.trim().is_empty() && info.device != order.device {
        let device = UpdateOrderRequest {
            device: Some(info.device.trim().to_string()),
            ..Default::default()
        };
        state
            .edit_team(|team| team.update_order(order_id, device))
            .await?;
    }
    state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .info = info.clone();

    log_activity(
        state,
        &user.email,
        "order.info_updated",
        Some(order_id),
        "Device information updated",
        None,
    )
    .await;

    Ok(ApiResponse::success("Information saved", info, Some(Meta::empty())))
}

pub async fn set_description(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    description: String,
) -> AppResult<ApiResponse<Order>> {
    let update = UpdateOrderRequest {
        description: Some(description.trim().to_string()),
        ..Default::default()
    };
    let order = state
        .edit_team(|team| team.update_order(order_id, update))
        .await?;
    state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .description = order.description.clone();

    log_activity(
        state,
        &user.email,
        "order.description_updated",
        Some(order_id),
        "Description updated",
        None,
    )
    .await;

    Ok(ApiResponse::success("Description saved", order, Some(Meta::empty())))
}

pub async fn add_log_entry(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    message: String,
) -> AppResult<ApiResponse<LogEntry>> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("Log message cannot be empty".into()));
    }
    let order = find_order(state, order_id).await?;
    let mut workspaces = state.workspaces.write().await;
    let workspace = workspaces.open(order_id, &order.description, &order.device);
    workspace.append_log(&user.email, message.trim(), Utc::now());
    let entry = workspace
        .log
        .last()
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("log entry missing after append")))?;

    Ok(ApiResponse::success("Log entry added", entry, Some(Meta::empty())))
}

pub async fn add_comment(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    body: String,
) -> AppResult<ApiResponse<Comment>> {
    let order = find_order(state, order_id).await?;
    let comment = state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .add_comment(&user.email, &body, Utc::now())?;

    Ok(ApiResponse::success("Comment added", comment, Some(Meta::empty())))
}

pub async fn delete_comment(
    state: &AppState,
    order_id: &str,
    comment_id: &str,
) -> AppResult<ApiResponse<Comment>> {
    find_order(state, order_id).await?;
    let comment = state
        .workspaces
        .write()
        .await
        .get_mut(order_id)
        .ok_or(AppError::NotFound)?
        .delete_comment(comment_id)?;

    Ok(ApiResponse::success("Comment deleted", comment, Some(Meta::empty())))
}

pub async fn add_customer_request(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    title: String,
    details: String,
) -> AppResult<ApiResponse<CustomerRequest>> {
    let order = find_order(state, order_id).await?;
    let request = state
        .workspaces
        .write()
        .await
        .open(order_id, &order.description, &order.device)
        .add_request(&title, &details, Utc::now())?;

    log_activity(
        state,
        &user.email,
        "order.request_added",
        Some(order_id),
        format!("Customer request added: {}", request.title),
        None,
    )
    .await;

    Ok(ApiResponse::success("Request added", request, Some(Meta::empty())))
}

pub async fn set_customer_request_status(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    request_id: &str,
    status: RequestStatus,
) -> AppResult<ApiResponse<CustomerRequest>> {
    find_order(state, order_id).await?;
    let request = state
        .workspaces
        .write()
        .await
        .get_mut(order_id)
        .ok_or(AppError::NotFound)?
        .set_request_status(request_id, status)?;

    log_activity(
        state,
        &user.email,
        "order.request_status",
        Some(order_id),
        format!("Customer request {} marked {}", request.title, status.as_str()),
        None,
    )
    .await;

    Ok(ApiResponse::success("Request updated", request, Some(Meta::empty())))
}

pub async fn get_timer(state: &AppState, order_id: &str) -> AppResult<ApiResponse<TimerView>> {
    find_order(state, order_id).await?;
    let view = match state.workspaces.read().await.get(order_id) {
        Some(workspace) => TimerView::at(&workspace.timer, Utc::now()),
        None => TimerView::at(&Default::default(), Utc::now()),
    };
    Ok(ApiResponse::success("Ok", view, None))
}

pub async fn timer_action(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    action: TimerAction,
) -> AppResult<ApiResponse<TimerView>> {
    let order = find_order(state, order_id).await?;
    let now = Utc::now();
    let (view, stopped_at) = {
        let mut workspaces = state.workspaces.write().await;
        let timer = &mut workspaces
            .open(order_id, &order.description, &order.device)
            .timer;
        let stopped_at = match action {
            TimerAction::Start => {
                timer.start(now)?;
                None
            }
            TimerAction::Pause => {
                timer.pause(now)?;
                None
            }
            TimerAction::Stop => Some(timer.stop(now)),
        };
        (TimerView::at(timer, now), stopped_at)
    };

    let message = match stopped_at {
        Some(secs) => {
            let spent = format_duration(secs);
            log_activity(
                state,
                &user.email,
                "order.timer_stopped",
                Some(order_id),
                format!("Work time recorded: {spent}"),
                Some(json!({ "seconds": secs })),
            )
            .await;
            format!("Timer stopped at {spent}")
        }
        None => match action {
            TimerAction::Start => "Timer started".to_string(),
            _ => "Timer paused".to_string(),
        },
    };

    Ok(ApiResponse::success(message, view, Some(Meta::empty())))
}

pub async fn list_attachments(
    state: &AppState,
    order_id: &str,
) -> AppResult<ApiResponse<AttachmentList>> {
    find_order(state, order_id).await?;
    let items = state
        .workspaces
        .read()
        .await
        .get(order_id)
        .map(|w| w.attachments.clone())
        .unwrap_or_default();
    Ok(ApiResponse::success("Ok", AttachmentList { items }, None))
}

pub async fn upload_attachments(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    files: Vec<UploadedFile>,
) -> AppResult<ApiResponse<AttachmentList>> {
    if files.is_empty() {
        return Err(AppError::BadRequest("No files were uploaded".into()));
    }
    let order = find_order(state, order_id).await?;
    let now = Utc::now();
    let items = {
        let mut workspaces = state.workspaces.write().await;
        let workspace = workspaces.open(order_id, &order.description, &order.device);
        let mut added = Vec::with_capacity(files.len());
        for file in files {
            added.push(workspace.add_attachment(
                &file.file_name,
                &file.content_type,
                file.bytes,
                now,
            )?);
        }
        added
    };

    let names: Vec<&str> = items.iter().map(|a| a.file_name.as_str()).collect();
    log_activity(
        state,
        &user.email,
        "order.attachments_added",
        Some(order_id),
        format!("Attached {}", names.join(", ")),
        None,
    )
    .await;

    Ok(ApiResponse::success(
        format!("{} file(s) uploaded", items.len()),
        AttachmentList { items },
        Some(Meta::empty()),
    ))
}

pub async fn attachment_content(
    state: &AppState,
    order_id: &str,
    attachment_id: &str,
) -> AppResult<AttachmentContent> {
    let workspaces = state.workspaces.read().await;
    let (attachment, bytes) = workspaces
        .get(order_id)
        .ok_or(AppError::NotFound)?
        .attachment(attachment_id)?;
    Ok(AttachmentContent {
        file_name: attachment.file_name.clone(),
        content_type: attachment.content_type.clone(),
        bytes: bytes.to_vec(),
    })
}

pub async fn delete_attachment(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    attachment_id: &str,
    confirmed: bool,
) -> AppResult<ApiResponse<Attachment>> {
    let attachment = state
        .workspaces
        .write()
        .await
        .get_mut(order_id)
        .ok_or(AppError::NotFound)?
        .delete_attachment(attachment_id, confirmed)?;

    log_activity(
        state,
        &user.email,
        "order.attachment_deleted",
        Some(order_id),
        format!("Removed attachment {}", attachment.file_name),
        None,
    )
    .await;

    Ok(ApiResponse::success(
        "Attachment deleted",
        attachment,
        Some(Meta::empty()),
    ))
}

pub async fn attach_label(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    label_id: &str,
) -> AppResult<ApiResponse<Vec<Label>>> {
    let order = find_order(state, order_id).await?;
    // Registry stays locked until the id is attached. Lock order: labels, then workspaces.
    let (label, attached, ids) = {
        let labels = state.labels.read().await;
        let label = labels.get(label_id).cloned().ok_or(AppError::NotFound)?;
        let mut workspaces = state.workspaces.write().await;
        let workspace = workspaces.open(order_id, &order.description, &order.device);
        (label, workspace.attach_label(label_id), workspace.labels.clone())
    };

    if attached {
        log_activity(
            state,
            &user.email,
            "order.label_attached",
            Some(order_id),
            format!("Label {} added", label.name),
            None,
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Labels updated",
        resolve_labels(state, &ids).await,
        Some(Meta::empty()),
    ))
}

pub async fn detach_label(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    label_id: &str,
) -> AppResult<ApiResponse<Vec<Label>>> {
    find_order(state, order_id).await?;
    let ids = {
        let mut workspaces = state.workspaces.write().await;
        let workspace = workspaces.get_mut(order_id).ok_or(AppError::NotFound)?;
        if !workspace.detach_label(label_id) {
            return Err(AppError::NotFound);
        }
        workspace.labels.clone()
    };

    log_activity(
        state,
        &user.email,
        "order.label_detached",
        Some(order_id),
        format!("Label {label_id} removed"),
        None,
    )
    .await;

    Ok(ApiResponse::success(
        "Labels updated",
        resolve_labels(state, &ids).await,
        Some(Meta::empty()),
    ))
}
