//! Key/value document store with the `localStorage` contract.
//!
//! Every persisted artifact of the dashboard is a JSON string stored under a
//! fixed key. The store never validates documents; readers that fail to parse
//! a value log the failure and fall back to their defaults.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::OnConflict,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::{
    db::{DbPool, OrmConn},
    entity::storage_entries::{ActiveModel, Column, Entity as StorageEntries},
    error::AppResult,
};

pub mod keys {
    pub const TEAM_MEMBERS: &str = "teamMembers";
    pub const ORDERS: &str = "orders";
    pub const PREVIEW_DATA: &str = "previewData";
    pub const NEW_ORDER: &str = "newOrder";
    pub const ACCOUNTS: &str = "accounts";
    pub const STORE_PREFIX: &str = "store-";

    pub fn store_key(store_id: &str) -> String {
        format!("{STORE_PREFIX}{store_id}")
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

#[derive(Clone)]
pub struct PgStorage {
    orm: OrmConn,
}

impl PgStorage {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[derive(Clone)]
pub enum Storage {
    Memory(MemoryStorage),
    Postgres(PgStorage),
}

impl Storage {
    pub fn in_memory() -> Self {
        Storage::Memory(MemoryStorage::default())
    }

    pub fn postgres(orm: OrmConn) -> Self {
        Storage::Postgres(PgStorage::new(orm))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Storage::Memory(_) => "memory",
            Storage::Postgres(_) => "postgres",
        }
    }

    pub async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        match self {
            Storage::Memory(mem) => Ok(mem.entries.read().await.get(key).cloned()),
            Storage::Postgres(pg) => Ok(StorageEntries::find_by_id(key.to_string())
                .one(&pg.orm)
                .await?
                .map(|entry| entry.value)),
        }
    }

    pub async fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        match self {
            Storage::Memory(mem) => {
                mem.entries.write().await.insert(key.to_string(), value);
            }
            Storage::Postgres(pg) => upsert(&pg.orm, key, value).await?,
        }
        Ok(())
    }

    /// Writes several items together. On Postgres they commit in one transaction.
    pub async fn set_items(&self, items: Vec<(&str, String)>) -> AppResult<()> {
        match self {
            Storage::Memory(mem) => {
                let mut entries = mem.entries.write().await;
                for (key, value) in items {
                    entries.insert(key.to_string(), value);
                }
            }
            Storage::Postgres(pg) => {
                let txn = pg.orm.begin().await?;
                for (key, value) in items {
                    upsert(&txn, key, value).await?;
                }
                txn.commit().await?;
            }
        }
        Ok(())
    }

    /// Returns whether the key existed.
    pub async fn remove_item(&self, key: &str) -> AppResult<bool> {
        match self {
            Storage::Memory(mem) => Ok(mem.entries.write().await.remove(key).is_some()),
            Storage::Postgres(pg) => {
                let result = StorageEntries::delete_by_id(key.to_string())
                    .exec(&pg.orm)
                    .await?;
                Ok(result.rows_affected > 0)
            }
        }
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        match self {
            Storage::Memory(mem) => Ok(mem
                .entries
                .read()
                .await
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect()),
            Storage::Postgres(pg) => Ok(StorageEntries::find()
                .filter(Column::Key.starts_with(prefix))
                .order_by_asc(Column::Key)
                .all(&pg.orm)
                .await?
                .into_iter()
                .map(|entry| entry.key)
                .collect()),
        }
    }

    /// Readiness probe for the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        match self {
            Storage::Memory(_) => Ok(()),
            Storage::Postgres(pg) => {
                let pool: &DbPool = pg.orm.get_postgres_connection_pool();
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
        }
    }

    /// Reads and parses a JSON document. A malformed document is logged and reported as absent.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(raw) = self.get_item(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed stored document");
                Ok(None)
            }
        }
    }

    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw).await
    }
}

async fn upsert<C: ConnectionTrait>(conn: &C, key: &str, value: String) -> AppResult<()> {
    let entry = ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
        updated_at: Set(Utc::now().into()),
    };
    StorageEntries::insert(entry)
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_columns([Column::Value, Column::UpdatedAt])
                .to_owned(),
        )
        .exec(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_behaves_like_local_storage() {
        let storage = Storage::in_memory();
        assert_eq!(storage.get_item("orders").await.unwrap(), None);

        storage.set_item("orders", "[]".into()).await.unwrap();
        storage.set_item("orders", "[1]".into()).await.unwrap();
        assert_eq!(storage.get_item("orders").await.unwrap().as_deref(), Some("[1]"));

        assert!(storage.remove_item("orders").await.unwrap());
        assert!(!storage.remove_item("orders").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_document_loads_as_absent() {
        let storage = Storage::in_memory();
        storage
            .set_item(keys::TEAM_MEMBERS, "{not json".into())
            .await
            .unwrap();
        let loaded: Option<Vec<String>> = storage.load_json(keys::TEAM_MEMBERS).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn prefix_listing_only_returns_matching_keys() {
        let storage = Storage::in_memory();
        storage.set_item(&keys::store_key("200"), "{}".into()).await.unwrap();
        storage.set_item(&keys::store_key("100"), "{}".into()).await.unwrap();
        storage.set_item(keys::PREVIEW_DATA, "{}".into()).await.unwrap();

        let keys = storage.keys_with_prefix(keys::STORE_PREFIX).await.unwrap();
        assert_eq!(keys, vec!["store-100".to_string(), "store-200".to_string()]);
    }
}
