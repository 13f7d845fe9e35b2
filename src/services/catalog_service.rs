use crate::{
    dto::services::{CategoryList, CreateServiceRequest, ServiceList, UpdateServiceRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Service,
    response::{ApiResponse, Meta},
    routes::params::ServiceQuery,
    services::simulate_latency,
    state::AppState,
};

pub async fn list_services(
    state: &AppState,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let items = state
        .catalog
        .read()
        .await
        .search(query.q.as_deref(), query.category.as_deref());
    let meta = Meta::whole(&items);
    Ok(ApiResponse::success("Ok", ServiceList { items }, Some(meta)))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.catalog.read().await.categories();
    Ok(ApiResponse::success("Ok", CategoryList { items }, None))
}

pub async fn get_service(state: &AppState, id: &str) -> AppResult<ApiResponse<Service>> {
    let service = state
        .catalog
        .read()
        .await
        .get(id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", service, None))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    simulate_latency(state).await;
    let service = state.catalog.write().await.add(payload)?;
    tracing::info!(service_id = %service.id, by = %user.email, "service added");
    Ok(ApiResponse::success(
        "Service added successfully",
        service,
        Some(Meta::empty()),
    ))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    simulate_latency(state).await;
    let service = state.catalog.write().await.update(id, payload)?;
    tracing::info!(service_id = %service.id, by = %user.email, "service updated");
    Ok(ApiResponse::success(
        "Service updated successfully",
        service,
        Some(Meta::empty()),
    ))
}

pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Service>> {
    let service = state.catalog.write().await.remove(id)?;
    tracing::info!(service_id = %service.id, by = %user.email, "service deleted");
    Ok(ApiResponse::success(
        "Service deleted",
        service,
        Some(Meta::empty()),
    ))
}
