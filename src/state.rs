use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Order, TeamMember},
    seed,
    storage::{Storage, keys},
    stores::{HeaderPanels, LabelRegistry, ServiceCatalog, TeamStore, WebsiteDocument, Workspaces},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Storage,
    pub team: Arc<RwLock<TeamStore>>,
    pub catalog: Arc<RwLock<ServiceCatalog>>,
    pub labels: Arc<RwLock<LabelRegistry>>,
    pub workspaces: Arc<RwLock<Workspaces>>,
    pub website: Arc<RwLock<WebsiteDocument>>,
    pub header: Arc<RwLock<HeaderPanels>>,
    pub in_flight: InFlight,
}

impl AppState {
    /// Builds every store, rehydrating the persisted ones from `storage`.
    pub async fn load(config: AppConfig, storage: Storage) -> AppResult<Self> {
        let mut team = load_team(&storage).await?;
        if let Some(parked) = storage.load_json::<Order>(keys::NEW_ORDER).await? {
            team.note_order_id(&parked.id);
        }
        let website = storage
            .load_json::<WebsiteDocument>(keys::PREVIEW_DATA)
            .await?
            .unwrap_or_default();

        tracing::info!(
            backend = storage.backend_name(),
            members = team.members().len(),
            orders = team.orders().len(),
            "stores loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            storage,
            team: Arc::new(RwLock::new(team)),
            catalog: Arc::new(RwLock::new(ServiceCatalog::new(seed::services()))),
            labels: Arc::new(RwLock::new(LabelRegistry::new())),
            workspaces: Arc::new(RwLock::new(Workspaces::default())),
            website: Arc::new(RwLock::new(website)),
            header: Arc::new(RwLock::new(HeaderPanels::new(seed::notifications(Utc::now())))),
            in_flight: InFlight::default(),
        })
    }

    /// Applies one team mutation under the write lock. See [`commit_team`].
    pub async fn edit_team<T>(
        &self,
        op: impl FnOnce(&mut TeamStore) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut team = self.team.write().await;
        commit_team(&self.storage, &mut team, op).await
    }
}

/// Reads `teamMembers` and `orders`; each falls back to seed data on its own.
pub async fn load_team(storage: &Storage) -> AppResult<TeamStore> {
    let members = storage
        .load_json::<Vec<TeamMember>>(keys::TEAM_MEMBERS)
        .await?
        .unwrap_or_else(seed::team_members);
    let orders = storage
        .load_json::<Vec<Order>>(keys::ORDERS)
        .await?
        .unwrap_or_else(seed::orders);
    Ok(TeamStore::new(members, orders))
}

/// Mirrors both arrays of the team store to storage in a single write.
pub async fn persist_team(storage: &Storage, team: &TeamStore) -> AppResult<()> {
    let members = serde_json::to_string(team.members())?;
    let orders = serde_json::to_string(team.orders())?;
    storage
        .set_items(vec![(keys::TEAM_MEMBERS, members), (keys::ORDERS, orders)])
        .await
}

/// Runs `op` on a copy of `team` and swaps the copy in once it is persisted.
/// A failing `op` or save leaves `team` as it was.
pub async fn commit_team<T>(
    storage: &Storage,
    team: &mut TeamStore,
    op: impl FnOnce(&mut TeamStore) -> AppResult<T>,
) -> AppResult<T> {
    let mut draft = team.clone();
    let out = op(&mut draft)?;
    persist_team(storage, &draft).await?;
    *team = draft;
    Ok(out)
}

/// Keys of submissions currently being processed.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    /// Claims `key` until the returned guard is dropped. A key already claimed is a conflict.
    pub fn begin(&self, key: impl Into<String>) -> AppResult<InFlightGuard> {
        let key = key.into();
        let mut keys = self
            .keys
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("in-flight registry poisoned")))?;
        if !keys.insert(key.clone()) {
            return Err(AppError::Conflict(
                "The same request is already being processed".into(),
            ));
        }
        Ok(InFlightGuard {
            keys: self.keys.clone(),
            key,
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.keys.lock().map(|keys| keys.contains(key)).unwrap_or(false)
    }
}

pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_submission_is_rejected_while_in_flight() {
        let in_flight = InFlight::default();
        let guard = in_flight.begin("member:ana@example.com").unwrap();
        assert!(in_flight.is_pending("member:ana@example.com"));
        assert!(matches!(
            in_flight.begin("member:ana@example.com"),
            Err(AppError::Conflict(_))
        ));
        drop(guard);
        assert!(!in_flight.is_pending("member:ana@example.com"));
        assert!(in_flight.begin("member:ana@example.com").is_ok());
    }

    #[tokio::test]
    async fn team_round_trips_through_storage() {
        let storage = Storage::in_memory();
        let mut team = TeamStore::new(seed::team_members(), seed::orders());
        team.assign_order("20", "3").unwrap();
        persist_team(&storage, &team).await.unwrap();

        let reloaded = load_team(&storage).await.unwrap();
        assert_eq!(reloaded, team);
    }

    #[tokio::test]
    async fn failed_team_edit_leaves_store_and_storage_untouched() {
        let storage = Storage::in_memory();
        let mut team = TeamStore::new(seed::team_members(), seed::orders());
        let before = team.clone();

        let result = commit_team(&storage, &mut team, |draft| {
            draft.assign_order("20", "3")?;
            draft.set_order_total("20", f64::INFINITY)
        })
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(team, before);
        assert_eq!(storage.get_item(keys::ORDERS).await.unwrap(), None);
        assert_eq!(storage.get_item(keys::TEAM_MEMBERS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn committed_team_edit_is_persisted() {
        let storage = Storage::in_memory();
        let mut team = TeamStore::new(seed::team_members(), seed::orders());

        let order = commit_team(&storage, &mut team, |draft| draft.assign_order("20", "3"))
            .await
            .unwrap();

        assert_eq!(order.assigned_to.as_deref(), Some("3"));
        assert_eq!(load_team(&storage).await.unwrap(), team);
    }

    #[tokio::test]
    async fn malformed_orders_fall_back_to_seed() {
        let storage = Storage::in_memory();
        storage
            .set_item(keys::ORDERS, "[{\"id\": 18}]".into())
            .await
            .unwrap();
        storage.save_json(keys::TEAM_MEMBERS, &Vec::<TeamMember>::new()).await.unwrap();

        let team = load_team(&storage).await.unwrap();
        assert!(team.members().is_empty());
        assert_eq!(team.orders(), seed::orders().as_slice());
    }
}
