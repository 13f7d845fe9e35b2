use crate::{
    dto::header::{LanguageList, MarkAllRead, NotificationList},
    error::AppResult,
    models::Notification,
    response::{ApiResponse, Meta},
    routes::params::NotificationQuery,
    state::AppState,
    stores::header::Language,
};

pub async fn list_notifications(
    state: &AppState,
    query: NotificationQuery,
) -> AppResult<ApiResponse<NotificationList>> {
    let header = state.header.read().await;
    let items = header.notifications(query.category, query.unread.unwrap_or(false));
    Ok(ApiResponse::success(
        "Ok",
        NotificationList {
            items,
            unread_count: header.unread_count(),
        },
        None,
    ))
}

pub async fn mark_read(state: &AppState, id: &str) -> AppResult<ApiResponse<Notification>> {
    let notification = state.header.write().await.mark_read(id)?;
    Ok(ApiResponse::success(
        "Notification marked as read",
        notification,
        Some(Meta::empty()),
    ))
}

pub async fn mark_all_read(state: &AppState) -> AppResult<ApiResponse<MarkAllRead>> {
    let updated = state.header.write().await.mark_all_read();
    tracing::debug!(updated, "notifications marked as read");
    Ok(ApiResponse::success(
        "All notifications marked as read",
        MarkAllRead { updated },
        Some(Meta::empty()),
    ))
}

pub async fn dismiss(state: &AppState, id: &str) -> AppResult<ApiResponse<Notification>> {
    let notification = state.header.write().await.dismiss(id)?;
    Ok(ApiResponse::success(
        "Notification dismissed",
        notification,
        Some(Meta::empty()),
    ))
}

pub async fn list_languages(state: &AppState) -> AppResult<ApiResponse<LanguageList>> {
    let header = state.header.read().await;
    Ok(ApiResponse::success(
        "Ok",
        LanguageList {
            items: header.languages(),
            current: header.current_language(),
        },
        None,
    ))
}

pub async fn set_language(state: &AppState, code: &str) -> AppResult<ApiResponse<Language>> {
    let language = state.header.write().await.set_language(code)?;
    tracing::info!(language = %language.code, "interface language changed");
    Ok(ApiResponse::success(
        format!("Language set to {}", language.name),
        language,
        Some(Meta::empty()),
    ))
}
