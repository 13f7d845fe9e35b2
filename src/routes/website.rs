use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post, put},
};
use serde_json::Value;

use crate::{
    dto::website::{
        FormPreview, ItemAdded, PublishedStore, PublishedStoreList, ToggleSectionRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::{params::ImageQuery, workspace::read_files},
    services::website_service,
    state::AppState,
    stores::website::{FormField, FormFieldInput, SelectedSections, SocialLink, WebsiteDocument},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_document))
        .route("/sections/{section}", put(replace_section))
        .route("/selected-sections", put(set_selected_sections))
        .route("/selected-sections/{section}", put(toggle_section))
        .route("/lists/{list}", post(add_item))
        .route("/lists/{list}/{index}", put(update_item).delete(remove_item))
        .route("/team/{member}/social", post(add_member_social))
        .route("/team/{member}/social/{link}", delete(remove_member_social))
        .route("/contact/fields", post(add_field))
        .route("/contact/fields/{field_id}", put(update_field).delete(remove_field))
        .route("/contact/preview", get(contact_preview))
        .route("/images/{target}", post(upload_image))
        .route("/publish", post(publish))
        .route("/stores", get(list_stores))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/{store_id}", get(get_store))
}

#[utoipa::path(
    get,
    path = "/api/website",
    responses((status = 200, description = "Website draft", body = ApiResponse<WebsiteDocument>)),
    tag = "Website"
)]
pub async fn get_document(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::get_document(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/website/sections/{section}",
    params(("section" = String, Path, description = "header, hero, services, team, how-it-works, statistics, testimonials, contact, blog or footer")),
    request_body = Object,
    responses(
        (status = 200, description = "Section replaced", body = ApiResponse<WebsiteDocument>),
        (status = 400, description = "Unknown section or malformed content")
    ),
    tag = "Website"
)]
pub async fn replace_section(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(section): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::replace_section(&state, &section, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/website/selected-sections",
    request_body = SelectedSections,
    responses((status = 200, description = "Sections selected", body = ApiResponse<WebsiteDocument>)),
    tag = "Website"
)]
pub async fn set_selected_sections(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<SelectedSections>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::set_selected_sections(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/website/selected-sections/{section}",
    params(("section" = String, Path, description = "Section key")),
    request_body = ToggleSectionRequest,
    responses((status = 200, description = "Section toggled", body = ApiResponse<WebsiteDocument>)),
    tag = "Website"
)]
pub async fn toggle_section(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(section): Path<String>,
    Json(payload): Json<ToggleSectionRequest>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::toggle_section(&state, &section, payload.selected).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/website/lists/{list}",
    params(("list" = String, Path, description = "nav-links, services, team, steps, statistics, testimonials, blog-posts, footer-links or footer-social")),
    request_body = Object,
    responses(
        (status = 200, description = "Item appended", body = ApiResponse<ItemAdded>),
        (status = 400, description = "Unknown list or malformed item")
    ),
    tag = "Website"
)]
pub async fn add_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(list): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ApiResponse<ItemAdded>>> {
    let resp = website_service::add_item(&state, &list, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/website/lists/{list}/{index}",
    params(
        ("list" = String, Path, description = "List key"),
        ("index" = usize, Path, description = "Item position")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Item replaced", body = ApiResponse<WebsiteDocument>),
        (status = 400, description = "Index out of range")
    ),
    tag = "Website"
)]
pub async fn update_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((list, index)): Path<(String, usize)>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::update_item(&state, &list, index, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/website/lists/{list}/{index}",
    params(
        ("list" = String, Path, description = "List key"),
        ("index" = usize, Path, description = "Item position")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<WebsiteDocument>),
        (status = 400, description = "Index out of range")
    ),
    tag = "Website"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((list, index)): Path<(String, usize)>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::remove_item(&state, &list, index).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/website/team/{member}/social",
    params(("member" = usize, Path, description = "Team card position")),
    request_body = SocialLink,
    responses((status = 200, description = "Social link added", body = ApiResponse<ItemAdded>)),
    tag = "Website"
)]
pub async fn add_member_social(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(member): Path<usize>,
    Json(payload): Json<SocialLink>,
) -> AppResult<Json<ApiResponse<ItemAdded>>> {
    let resp = website_service::add_member_social(&state, member, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/website/team/{member}/social/{link}",
    params(
        ("member" = usize, Path, description = "Team card position"),
        ("link" = usize, Path, description = "Social link position")
    ),
    responses((status = 200, description = "Social link removed", body = ApiResponse<WebsiteDocument>)),
    tag = "Website"
)]
pub async fn remove_member_social(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((member, link)): Path<(usize, usize)>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::remove_member_social(&state, member, link).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/website/contact/fields",
    request_body = FormFieldInput,
    responses(
        (status = 200, description = "Field added", body = ApiResponse<FormField>),
        (status = 422, description = "Missing label or options")
    ),
    tag = "Website"
)]
pub async fn add_field(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<FormFieldInput>,
) -> AppResult<Json<ApiResponse<FormField>>> {
    let resp = website_service::add_field(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/website/contact/fields/{field_id}",
    params(("field_id" = String, Path, description = "Field ID")),
    request_body = FormFieldInput,
    responses((status = 200, description = "Field updated", body = ApiResponse<FormField>)),
    tag = "Website"
)]
pub async fn update_field(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(field_id): Path<String>,
    Json(payload): Json<FormFieldInput>,
) -> AppResult<Json<ApiResponse<FormField>>> {
    let resp = website_service::update_field(&state, &field_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/website/contact/fields/{field_id}",
    params(("field_id" = String, Path, description = "Field ID")),
    responses((status = 200, description = "Field removed", body = ApiResponse<FormField>)),
    tag = "Website"
)]
pub async fn remove_field(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(field_id): Path<String>,
) -> AppResult<Json<ApiResponse<FormField>>> {
    let resp = website_service::remove_field(&state, &field_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/website/contact/preview",
    responses((status = 200, description = "Contact form laid out in 12-column rows", body = ApiResponse<FormPreview>)),
    tag = "Website"
)]
pub async fn contact_preview(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<FormPreview>>> {
    let resp = website_service::contact_preview(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/website/images/{target}",
    params(
        ("target" = String, Path, description = "logo, hero, team, testimonial or blog"),
        ImageQuery
    ),
    request_body(content_type = "multipart/form-data", description = "A single image file"),
    responses(
        (status = 200, description = "Image embedded as a data URL", body = ApiResponse<WebsiteDocument>),
        (status = 400, description = "Not an image, or index missing or out of range")
    ),
    tag = "Website"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(target): Path<String>,
    Query(query): Query<ImageQuery>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let file = read_files(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("No image was uploaded".into()))?;
    let resp =
        website_service::upload_image(&state, &target, query.index, &file.content_type, &file.bytes)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/website/publish",
    responses((status = 200, description = "Draft published", body = ApiResponse<PublishedStore>)),
    tag = "Website"
)]
pub async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PublishedStore>>> {
    let resp = website_service::publish(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/website/stores",
    responses((status = 200, description = "Published stores", body = ApiResponse<PublishedStoreList>)),
    tag = "Website"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<PublishedStoreList>>> {
    let resp = website_service::list_stores(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/{store_id}",
    params(("store_id" = String, Path, description = "Publish timestamp")),
    responses(
        (status = 200, description = "Published website", body = ApiResponse<WebsiteDocument>),
        (status = 404, description = "No store with that id")
    ),
    security(()),
    tag = "Website"
)]
pub async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<Json<ApiResponse<WebsiteDocument>>> {
    let resp = website_service::get_store(&state, &store_id).await?;
    Ok(Json(resp))
}
