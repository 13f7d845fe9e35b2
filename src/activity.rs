use chrono::Utc;
use serde_json::Value;

use crate::state::AppState;

/// Records a business event. Events about an order are also appended to that order's log.
///
/// Takes the team and workspace locks, so callers must release theirs first.
pub async fn log_activity(
    state: &AppState,
    actor: &str,
    action: &str,
    order_id: Option<&str>,
    message: impl Into<String>,
    metadata: Option<Value>,
) {
    let message = message.into();
    let metadata = metadata.unwrap_or_default().to_string();
    tracing::info!(
        target: "activity",
        actor,
        action,
        order_id = order_id.unwrap_or("-"),
        metadata = %metadata,
        "{message}"
    );

    let Some(order_id) = order_id else {
        return;
    };
    let (description, device) = {
        let team = state.team.read().await;
        match team.order(order_id) {
            Some(order) => (order.description.clone(), order.device.clone()),
            None => return,
        }
    };
    state
        .workspaces
        .write()
        .await
        .open(order_id, &description, &device)
        .append_log(actor, message, Utc::now());
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{config::AppConfig, storage::Storage};

    #[tokio::test]
    async fn order_events_land_in_the_order_log() {
        let state = AppState::load(AppConfig::local("secret"), Storage::in_memory())
            .await
            .unwrap();

        log_activity(
            &state,
            "ana@example.com",
            "order.moved",
            Some("18"),
            "Moved to Ready",
            Some(json!({ "to": "ready" })),
        )
        .await;
        log_activity(&state, "ana@example.com", "member.created", None, "Added", None).await;

        let mut workspaces = state.workspaces.write().await;
        let log = &workspaces.open("18", "", "").log;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].actor, "ana@example.com");
        assert_eq!(log[0].message, "Moved to Ready");
    }
}
