use async_trait::async_trait;
use chrono::NaiveDate;
use domains::{DailyStat, DomainError, Result, ViewStatsRepository};
use sqlx::Row;
use uuid::Uuid;

use super::{internal, SqliteStore};

#[async_trait]
impl ViewStatsRepository for SqliteStore {
    async fn increment_article_views(&self, article_id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE articles SET views = views + 1 WHERE id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("article", article_id));
        }
        Ok(())
    }

    /// Single-statement upsert, so concurrent views only ever add.
    async fn increment_daily_views(
        &self,
        owner_id: Uuid,
        article_id: Uuid,
        day: NaiveDate,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO daily_stats (owner_id, article_id, day, views) VALUES (?, ?, ?, 1) \
             ON CONFLICT (article_id, day) DO UPDATE SET views = views + 1",
        )
        .bind(owner_id)
        .bind(article_id)
        .bind(day)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn daily_stats(
        &self,
        owner_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyStat>> {
        let rows = sqlx::query(
            "SELECT owner_id, article_id, day, views FROM daily_stats \
             WHERE owner_id = ? AND day >= ? AND day <= ? ORDER BY day",
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;

        rows.iter()
            .map(|row| {
                Ok(DailyStat {
                    owner_id: row.try_get("owner_id")?,
                    article_id: row.try_get("article_id")?,
                    day: row.try_get("day")?,
                    views: row.try_get("views")?,
                })
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(internal)
    }
}
