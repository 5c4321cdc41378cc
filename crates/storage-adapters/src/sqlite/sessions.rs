use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{Result, Session, SessionRepository};
use sqlx::Row;
use tracing::debug;

use super::{db_error, internal, SqliteStore};

#[async_trait]
impl SessionRepository for SqliteStore {
    async fn create_session(&self, session: Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Session already exists"))?;
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            "SELECT token_hash, user_id, created_at, expires_at FROM sessions WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Session {
            token_hash: row.try_get("token_hash").map_err(internal)?,
            user_id: row.try_get("user_id").map_err(internal)?,
            created_at: row.try_get("created_at").map_err(internal)?,
            expires_at: row.try_get("expires_at").map_err(internal)?,
        }))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(internal)?
            .rows_affected();
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }
        Ok(purged)
    }
}
