use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{ApiKey, ApiKeyRepository, NewApiKey, Result};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{db_error, internal, SqliteStore};

const COLUMNS: &str = "id, owner_id, name, prefix, created_at, last_used";

fn to_key(row: &SqliteRow) -> std::result::Result<ApiKey, sqlx::Error> {
    Ok(ApiKey {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        prefix: row.try_get("prefix")?,
        created_at: row.try_get("created_at")?,
        last_used: row.try_get("last_used")?,
    })
}

#[async_trait]
impl ApiKeyRepository for SqliteStore {
    #[tracing::instrument(skip(self, key), fields(owner_id = %key.owner_id), level = "debug")]
    async fn create_key(&self, key: NewApiKey) -> Result<ApiKey> {
        let created = ApiKey {
            id: Uuid::now_v7(),
            owner_id: key.owner_id,
            name: key.name,
            prefix: key.prefix,
            created_at: Utc::now(),
            last_used: None,
        };

        sqlx::query(
            "INSERT INTO api_keys (id, owner_id, name, prefix, key_hash, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(created.id)
        .bind(created.owner_id)
        .bind(&created.name)
        .bind(&created.prefix)
        .bind(&key.key_hash)
        .bind(created.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("API key already exists"))?;

        Ok(created)
    }

    async fn list_keys(&self, owner_id: Uuid) -> Result<Vec<ApiKey>> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM api_keys WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?
        .iter()
        .map(to_key)
        .collect::<std::result::Result<_, _>>()
        .map_err(internal)
    }

    async fn delete_key(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM api_keys WHERE key_hash = ?"))
            .bind(key_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| to_key(&row))
            .transpose()
            .map_err(internal)
    }

    async fn touch_key(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE api_keys SET last_used = ? WHERE id = ?")
            .bind(used_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}
