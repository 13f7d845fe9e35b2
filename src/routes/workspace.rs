use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};

use crate::{
    dto::workspace::{
        AttachLabelRequest, AttachmentList, CommentRequest, CostView, CustomerRequestPayload,
        DescriptionRequest, LogRequest, RequestStatusPayload, TimerActionRequest, TimerView,
        UploadedFile, WorkspaceView,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Label, Order},
    response::ApiResponse,
    routes::params::ConfirmQuery,
    services::workspace_service,
    state::AppState,
    stores::workspace::{Attachment, Comment, CostSection, CustomerRequest, DeviceInfo, LogEntry},
};

/// Order detail page routes, merged into the `/orders` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/workspace", get(get_workspace))
        .route("/{id}/cost", put(set_cost))
        .route("/{id}/info", put(set_info))
        .route("/{id}/description", put(set_description))
        .route("/{id}/log", post(add_log_entry))
        .route("/{id}/comments", post(add_comment))
        .route("/{id}/comments/{comment_id}", delete(delete_comment))
        .route("/{id}/requests", post(add_customer_request))
        .route("/{id}/requests/{request_id}", patch(set_request_status))
        .route("/{id}/timer", get(get_timer).post(timer_action))
        .route(
            "/{id}/attachments",
            get(list_attachments).post(upload_attachments),
        )
        .route(
            "/{id}/attachments/{attachment_id}",
            delete(delete_attachment),
        )
        .route(
            "/{id}/attachments/{attachment_id}/content",
            get(attachment_content),
        )
        .route(
            "/{id}/attachments/{attachment_id}/download",
            get(download_attachment),
        )
        .route("/{id}/labels", post(attach_label))
        .route("/{id}/labels/{label_id}", delete(detach_label))
}

/// Reads every file part of a multipart body. Parts without a file name are skipped.
pub(crate) async fn read_files(mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(str::to_string)
            .filter(|ct| ct != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?;
        files.push(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/workspace",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order detail sections", body = ApiResponse<WorkspaceView>),
        (status = 404, description = "Order not found")
    ),
    tag = "Workspace"
)]
pub async fn get_workspace(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<WorkspaceView>>> {
    let resp = workspace_service::get_workspace(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/cost",
    params(("id" = String, Path, description = "Order ID")),
    request_body = CostSection,
    responses(
        (status = 200, description = "Cost saved and order total updated", body = ApiResponse<CostView>),
        (status = 422, description = "Invalid cost lines")
    ),
    tag = "Workspace"
)]
pub async fn set_cost(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CostSection>,
) -> AppResult<Json<ApiResponse<CostView>>> {
    let resp = workspace_service::set_cost(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/info",
    params(("id" = String, Path, description = "Order ID")),
    request_body = DeviceInfo,
    responses((status = 200, description = "Device information saved", body = ApiResponse<DeviceInfo>)),
    tag = "Workspace"
)]
pub async fn set_info(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<DeviceInfo>,
) -> AppResult<Json<ApiResponse<DeviceInfo>>> {
    let resp = workspace_service::set_info(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/description",
    params(("id" = String, Path, description = "Order ID")),
    request_body = DescriptionRequest,
    responses(
        (status = 200, description = "Description saved", body = ApiResponse<Order>),
        (status = 422, description = "Empty description")
    ),
    tag = "Workspace"
)]
pub async fn set_description(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<DescriptionRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = workspace_service::set_description(&state, &user, &id, payload.description).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/log",
    params(("id" = String, Path, description = "Order ID")),
    request_body = LogRequest,
    responses((status = 200, description = "Log entry appended", body = ApiResponse<LogEntry>)),
    tag = "Workspace"
)]
pub async fn add_log_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<LogRequest>,
) -> AppResult<Json<ApiResponse<LogEntry>>> {
    let resp = workspace_service::add_log_entry(&state, &user, &id, payload.message).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/comments",
    params(("id" = String, Path, description = "Order ID")),
    request_body = CommentRequest,
    responses((status = 200, description = "Comment added", body = ApiResponse<Comment>)),
    tag = "Workspace"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let resp = workspace_service::add_comment(&state, &user, &id, payload.body).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/comments/{comment_id}",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("comment_id" = String, Path, description = "Comment ID")
    ),
    responses((status = 200, description = "Comment deleted", body = ApiResponse<Comment>)),
    tag = "Workspace"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let resp = workspace_service::delete_comment(&state, &id, &comment_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/requests",
    params(("id" = String, Path, description = "Order ID")),
    request_body = CustomerRequestPayload,
    responses((status = 200, description = "Customer request added", body = ApiResponse<CustomerRequest>)),
    tag = "Workspace"
)]
pub async fn add_customer_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CustomerRequestPayload>,
) -> AppResult<Json<ApiResponse<CustomerRequest>>> {
    let resp =
        workspace_service::add_customer_request(&state, &user, &id, payload.title, payload.details)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/requests/{request_id}",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("request_id" = String, Path, description = "Customer request ID")
    ),
    request_body = RequestStatusPayload,
    responses((status = 200, description = "Customer request updated", body = ApiResponse<CustomerRequest>)),
    tag = "Workspace"
)]
pub async fn set_request_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, request_id)): Path<(String, String)>,
    Json(payload): Json<RequestStatusPayload>,
) -> AppResult<Json<ApiResponse<CustomerRequest>>> {
    let resp = workspace_service::set_customer_request_status(
        &state,
        &user,
        &id,
        &request_id,
        payload.status,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/timer",
    params(("id" = String, Path, description = "Order ID")),
    responses((status = 200, description = "Timer state", body = ApiResponse<TimerView>)),
    tag = "Workspace"
)]
pub async fn get_timer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TimerView>>> {
    let resp = workspace_service::get_timer(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/timer",
    params(("id" = String, Path, description = "Order ID")),
    request_body = TimerActionRequest,
    responses(
        (status = 200, description = "Timer updated", body = ApiResponse<TimerView>),
        (status = 400, description = "Action not allowed in the current state")
    ),
    tag = "Workspace"
)]
pub async fn timer_action(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TimerActionRequest>,
) -> AppResult<Json<ApiResponse<TimerView>>> {
    let resp = workspace_service::timer_action(&state, &user, &id, payload.action).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/attachments",
    params(("id" = String, Path, description = "Order ID")),
    responses((status = 200, description = "Attachment metadata", body = ApiResponse<AttachmentList>)),
    tag = "Workspace"
)]
pub async fn list_attachments(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AttachmentList>>> {
    let resp = workspace_service::list_attachments(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/attachments",
    params(("id" = String, Path, description = "Order ID")),
    request_body(content_type = "multipart/form-data", description = "One or more files"),
    responses(
        (status = 200, description = "Files attached", body = ApiResponse<AttachmentList>),
        (status = 400, description = "No files or an empty file")
    ),
    tag = "Workspace"
)]
pub async fn upload_attachments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<AttachmentList>>> {
    let files = read_files(multipart).await?;
    let resp = workspace_service::upload_attachments(&state, &user, &id, files).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/attachments/{attachment_id}/content",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("attachment_id" = String, Path, description = "Attachment ID")
    ),
    responses((status = 200, description = "Raw file, served inline")),
    tag = "Workspace"
)]
pub async fn attachment_content(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, attachment_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let file = workspace_service::attachment_content(&state, &id, &attachment_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, "inline".to_string()),
        ],
        file.bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/attachments/{attachment_id}/download",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("attachment_id" = String, Path, description = "Attachment ID")
    ),
    responses((status = 200, description = "Raw file, served as a download")),
    tag = "Workspace"
)]
pub async fn download_attachment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, attachment_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let file = workspace_service::attachment_content(&state, &id, &attachment_id).await?;
    let file_name = file.file_name.replace(['"', '\\', '\r', '\n'], "_");
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        file.bytes,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/attachments/{attachment_id}",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("attachment_id" = String, Path, description = "Attachment ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Attachment deleted", body = ApiResponse<Attachment>),
        (status = 400, description = "Deletion not confirmed")
    ),
    tag = "Workspace"
)]
pub async fn delete_attachment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, attachment_id)): Path<(String, String)>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<ApiResponse<Attachment>>> {
    let resp = workspace_service::delete_attachment(
        &state,
        &user,
        &id,
        &attachment_id,
        query.confirm.unwrap_or(false),
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/labels",
    params(("id" = String, Path, description = "Order ID")),
    request_body = AttachLabelRequest,
    responses(
        (status = 200, description = "Labels on the order", body = ApiResponse<Vec<Label>>),
        (status = 404, description = "Order or label not found")
    ),
    tag = "Workspace"
)]
pub async fn attach_label(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AttachLabelRequest>,
) -> AppResult<Json<ApiResponse<Vec<Label>>>> {
    let resp = workspace_service::attach_label(&state, &user, &id, &payload.label_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/labels/{label_id}",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("label_id" = String, Path, description = "Label ID")
    ),
    responses((status = 200, description = "Labels on the order", body = ApiResponse<Vec<Label>>)),
    tag = "Workspace"
)]
pub async fn detach_label(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, label_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<Label>>>> {
    let resp = workspace_service::detach_label(&state, &user, &id, &label_id).await?;
    Ok(Json(resp))
}
