use async_trait::async_trait;
use chrono::Utc;
use models::{entry, user::DEFAULT_USER_ID};
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryResult, QuerySelect,
};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::KvStore;
use crate::errors::ServiceError;

const VALUE_PREVIEW_CHARS: usize = 200;
const KEY_COLUMN: &str = "data_key";
const VALUE_COLUMN: &str = "data_value";

/// `KvStore` over the `entries` table, scoped to one user.
#[derive(Clone, Debug)]
pub struct EntryStore {
    db: DatabaseConnection,
    user_id: i32,
}

impl EntryStore {
    /// Store owned by the seed user.
    pub fn new(db: DatabaseConnection) -> Self {
        Self::for_user(db, DEFAULT_USER_ID)
    }

    pub fn for_user(db: DatabaseConnection, user_id: i32) -> Self {
        Self { db, user_id }
    }

    #[cfg(test)]
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// Close the underlying pool. Other clones of the connection stop working.
    pub async fn close(self) -> Result<(), ServiceError> {
        self.db.close().await?;
        Ok(())
    }
}

/// Projection of `(data_key, data_value)` with the value normalized to JSON.
struct StoredEntry {
    key: String,
    value: Value,
}

impl FromQueryResult for StoredEntry {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        let key = res.try_get(pre, KEY_COLUMN)?;
        let value = decode_value(res, pre)?;
        Ok(Self { key, value })
    }
}

/// Drivers disagree on JSON columns: most decode them as structured JSON,
/// some hand back the raw text. Accept both.
fn decode_value(res: &QueryResult, pre: &str) -> Result<Value, DbErr> {
    match res.try_get::<Value>(pre, VALUE_COLUMN) {
        Ok(v) => Ok(v),
        Err(_) => {
            let text: String = res.try_get(pre, VALUE_COLUMN)?;
            serde_json::from_str(&text).map_err(|e| DbErr::Json(e.to_string()))
        }
    }
}

fn preview(value: &Value) -> String {
    value.to_string().chars().take(VALUE_PREVIEW_CHARS).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl KvStore for EntryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        let row = entry::Entity::find()
            .select_only()
            .column(entry::Column::DataKey)
            .column(entry::Column::DataValue)
            .filter(entry::Column::UserId.eq(self.user_id))
            .filter(entry::Column::DataKey.eq(key))
            .into_model::<StoredEntry>()
            .one(&self.db)
            .await
            .inspect_err(|e| {
                error!(op = "get", key, user_id = self.user_id, error = %e, "error getting data");
            })?;
        Ok(row.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        let value_kind = kind(&value);
        let value_preview = preview(&value);

        let on_conflict = OnConflict::columns([entry::Column::UserId, entry::Column::DataKey])
            .update_columns([entry::Column::DataValue, entry::Column::UpdatedAt])
            .to_owned();

        entry::Entity::insert(entry::ActiveModel {
            user_id: Set(self.user_id),
            data_key: Set(key.to_owned()),
            data_value: Set(value),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .on_conflict(on_conflict)
        .exec_without_returning(&self.db)
        .await
        .inspect_err(|e| {
            error!(
                op = "set",
                key,
                user_id = self.user_id,
                value_kind,
                value = %value_preview,
                error = %e,
                "error setting data"
            );
        })?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Map<String, Value>, ServiceError> {
        let rows = entry::Entity::find()
            .select_only()
            .column(entry::Column::DataKey)
            .column(entry::Column::DataValue)
            .filter(entry::Column::UserId.eq(self.user_id))
            .into_model::<StoredEntry>()
            .all(&self.db)
            .await
            .inspect_err(|e| {
                error!(op = "get_all", user_id = self.user_id, error = %e, "error getting all data");
            })?;
        Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        let res = entry::Entity::delete_many()
            .filter(entry::Column::UserId.eq(self.user_id))
            .filter(entry::Column::DataKey.eq(key))
            .exec(&self.db)
            .await
            .inspect_err(|e| {
                error!(op = "delete", key, user_id = self.user_id, error = %e, "error deleting data");
            })?;
        debug!(op = "delete", key, existed = res.rows_affected > 0, "entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::get_db;
    use models::user;
    use sea_orm::ActiveModelTrait;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get_round_trips_structured_values() -> Result<(), anyhow::Error> {
        let store = EntryStore::new(get_db().await?);
        let samples = [
            ("streak", json!(5)),
            ("enabled", json!(true)),
            ("name", json!("morning run")),
            ("nothing", json!(null)),
            ("habits", json!([{"id": 1, "title": "read", "done": [true, false]}])),
            ("settings", json!({"theme": "dark", "reminder": {"hour": 7, "min": 30}})),
            ("text_that_looks_like_json", json!("[1,2,3]")),
        ];
        for (key, value) in &samples {
            store.set(key, value.clone()).await?;
        }
        for (key, value) in &samples {
            assert_eq!(store.get(key).await?.as_ref(), Some(value), "key {key}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_key_is_none() -> Result<(), anyhow::Error> {
        let store = EntryStore::new(get_db().await?);
        assert_eq!(store.get("never-written").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn second_write_replaces_first() -> Result<(), anyhow::Error> {
        let store = EntryStore::new(get_db().await?);
        store.set("k", json!({"v": 1})).await?;
        store.set("k", json!([2])).await?;
        assert_eq!(store.get("k").await?, Some(json!([2])));
        assert_eq!(store.get_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn overwrite_keeps_row_and_refreshes_updated_at() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = EntryStore::new(db.clone());
        let find_row = || {
            entry::Entity::find()
                .filter(entry::Column::UserId.eq(DEFAULT_USER_ID))
                .filter(entry::Column::DataKey.eq("streak"))
                .one(&db)
        };

        store.set("streak", json!(1)).await?;
        let first = find_row().await?.expect("row after first write");

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        store.set("streak", json!(2)).await?;
        let second = find_row().await?.expect("row after second write");

        assert_eq!(first.id, second.id);
        assert_eq!(second.data_value, json!(2));
        assert!(
            second.updated_at > first.updated_at,
            "updated_at not refreshed: {} -> {}",
            first.updated_at,
            second.updated_at
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), anyhow::Error> {
        let store = EntryStore::new(get_db().await?);
        store.delete("missing").await?;

        store.set("k", json!(1)).await?;
        store.delete("k").await?;
        assert_eq!(store.get("k").await?, None);
        store.delete("k").await?;
        Ok(())
    }

    #[tokio::test]
    async fn get_all_reflects_deletes() -> Result<(), anyhow::Error> {
        let store = EntryStore::new(get_db().await?);
        store.set("a", json!(1)).await?;
        store.set("b", json!(2)).await?;
        store.delete("a").await?;

        let all = store.get_all().await?;
        let mut expected = Map::new();
        expected.insert("b".into(), json!(2));
        assert_eq!(all, expected);
        Ok(())
    }

    #[tokio::test]
    async fn stores_are_scoped_per_user() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let other = user::ActiveModel {
            email: Set("other@local".into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let default_store = EntryStore::new(db.clone());
        let other_store = EntryStore::for_user(db, other.id);
        assert_eq!(default_store.user_id(), DEFAULT_USER_ID);

        default_store.set("shared", json!("mine")).await?;
        other_store.set("shared", json!("theirs")).await?;

        assert_eq!(default_store.get("shared").await?, Some(json!("mine")));
        assert_eq!(other_store.get("shared").await?, Some(json!("theirs")));

        other_store.delete("shared").await?;
        assert_eq!(default_store.get("shared").await?, Some(json!("mine")));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_writes_leave_one_of_the_values() -> Result<(), anyhow::Error> {
        let store: Arc<dyn KvStore> = Arc::new(EntryStore::new(get_db().await?));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.set("race", json!({"writer": i})).await }));
        }
        for h in handles {
            h.await??;
        }

        let winner = store.get("race").await?.expect("value present");
        let writer = winner["writer"].as_i64().expect("writer id");
        assert!((0..16).contains(&writer));
        assert_eq!(store.get_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn closed_store_reports_database_error() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = EntryStore::new(db.clone());
        EntryStore::new(db).close().await?;
        assert!(matches!(store.get("k").await, Err(ServiceError::Db(_))));
        Ok(())
    }
}
