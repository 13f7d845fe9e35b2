use crate::{
    dto::labels::LabelList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Label,
    response::{ApiResponse, Meta},
    state::AppState,
    stores::labels::NewLabel,
};

pub async fn list_labels(state: &AppState) -> AppResult<ApiResponse<LabelList>> {
    let items = state.labels.read().await.all().to_vec();
    let meta = Meta::whole(&items);
    Ok(ApiResponse::success("Ok", LabelList { items }, Some(meta)))
}

pub async fn create_label(
    state: &AppState,
    user: &AuthUser,
    payload: NewLabel,
) -> AppResult<ApiResponse<Label>> {
    let label = state.labels.write().await.create_custom(payload)?;
    tracing::info!(label_id = %label.id, color = %label.color, by = %user.email, "custom label created");
    Ok(ApiResponse::success(
        "Label created",
        label,
        Some(Meta::empty()),
    ))
}

/// Deletes a custom label and detaches it from every order.
pub async fn delete_label(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Label>> {
    let label = {
        let mut labels = state.labels.write().await;
        let label = labels.delete_custom(id)?;
        state.workspaces.write().await.detach_label_everywhere(id);
        label
    };
    tracing::info!(label_id = %label.id, by = %user.email, "custom label deleted");
    Ok(ApiResponse::success(
        "Label deleted",
        label,
        Some(Meta::empty()),
    ))
}
