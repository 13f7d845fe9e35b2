use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::team::{CreateMemberRequest, MemberList, UpdateMemberRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::TeamMember,
    response::ApiResponse,
    routes::params::MemberQuery,
    services::team_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/{id}",
            get(get_member).patch(update_member).delete(delete_member),
        )
}

#[utoipa::path(
    get,
    path = "/api/team",
    params(MemberQuery),
    responses(
        (status = 200, description = "Search team members", body = ApiResponse<MemberList>)
    ),
    tag = "Team"
)]
pub async fn list_members(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<ApiResponse<MemberList>>> {
    let resp = team_service::list_members(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/team/{id}",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Team member", body = ApiResponse<TeamMember>),
        (status = 404, description = "Member not found")
    ),
    tag = "Team"
)]
pub async fn get_member(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TeamMember>>> {
    let resp = team_service::get_member(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/team",
    request_body = CreateMemberRequest,
    responses(
        (status = 200, description = "Member added", body = ApiResponse<TeamMember>),
        (status = 409, description = "Same submission already in flight"),
        (status = 422, description = "Invalid fields")
    ),
    tag = "Team"
)]
pub async fn create_member(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> AppResult<Json<ApiResponse<TeamMember>>> {
    let resp = team_service::create_member(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/team/{id}",
    params(("id" = String, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = ApiResponse<TeamMember>),
        (status = 404, description = "Member not found")
    ),
    tag = "Team"
)]
pub async fn update_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMemberRequest>,
) -> AppResult<Json<ApiResponse<TeamMember>>> {
    let resp = team_service::update_member(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/team/{id}",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member removed, its orders unassigned", body = ApiResponse<TeamMember>),
        (status = 404, description = "Member not found")
    ),
    tag = "Team"
)]
pub async fn delete_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TeamMember>>> {
    let resp = team_service::delete_member(&state, &user, &id).await?;
    Ok(Json(resp))
}
