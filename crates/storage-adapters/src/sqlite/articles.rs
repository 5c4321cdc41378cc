use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Article, ArticlePatch, ArticleRepository, NewArticle, Result, ViewTotals,
};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::debug;
use uuid::Uuid;

use super::{db_error, internal, SqliteStore};

const COLUMNS: &str =
    "id, owner_id, slug, title, content, summary, image_url, published, views, created_at, updated_at";

const SLUG_CONFLICT: &str = "Slug already exists for this user";

fn to_article(row: &SqliteRow) -> std::result::Result<Article, sqlx::Error> {
    Ok(Article {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        summary: row.try_get("summary")?,
        image_url: row.try_get("image_url")?,
        published: row.try_get("published")?,
        views: row.try_get("views")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_articles(rows: Vec<SqliteRow>) -> Result<Vec<Article>> {
    rows.iter()
        .map(to_article)
        .collect::<std::result::Result<_, _>>()
        .map_err(internal)
}

#[async_trait]
impl ArticleRepository for SqliteStore {
    #[tracing::instrument(skip(self, article), fields(slug = %article.slug), level = "debug")]
    async fn create_article(&self, article: NewArticle) -> Result<Article> {
        let now = Utc::now();
        let created = Article {
            id: Uuid::now_v7(),
            owner_id: article.owner_id,
            slug: article.slug,
            title: article.title,
            content: article.content,
            summary: article.summary,
            image_url: article.image_url,
            published: article.published,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO articles ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(created.id)
        .bind(created.owner_id)
        .bind(&created.slug)
        .bind(&created.title)
        .bind(&created.content)
        .bind(&created.summary)
        .bind(&created.image_url)
        .bind(created.published)
        .bind(created.views)
        .bind(created.created_at)
        .bind(created.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error(SLUG_CONFLICT))?;

        Ok(created)
    }

    async fn get_article(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Article>> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?
        .map(|row| to_article(&row))
        .transpose()
        .map_err(internal)
    }

    async fn find_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Option<Article>> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE owner_id = ? AND slug = ?"
        ))
        .bind(owner_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?
        .map(|row| to_article(&row))
        .transpose()
        .map_err(internal)
    }

    async fn list_articles(&self, owner_id: Uuid) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        to_articles(rows)
    }

    async fn list_published(&self, owner_id: Uuid) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE owner_id = ? AND published = 1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        to_articles(rows)
    }

    /// Read, patch in memory, write back. `views` is never part of the write.
    #[tracing::instrument(skip(self, patch), level = "debug")]
    async fn update_article(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: ArticlePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(internal)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut article = to_article(&row).map_err(internal)?;
        patch.apply(&mut article);
        article.updated_at = updated_at;

        sqlx::query(
            "UPDATE articles SET slug = ?, title = ?, content = ?, summary = ?, image_url = ?, \
             published = ?, updated_at = ? WHERE id = ? AND owner_id = ?",
        )
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.summary)
        .bind(&article.image_url)
        .bind(article.published)
        .bind(article.updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error(SLUG_CONFLICT))?;

        tx.commit().await.map_err(internal)?;
        debug!(article_id = %id, "article updated");
        Ok(Some(article))
    }

    async fn delete_article(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(result.rows_affected() > 0)
    }

    async fn top_articles(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM articles WHERE owner_id = ? \
             ORDER BY views DESC, created_at DESC LIMIT ?"
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        to_articles(rows)
    }

    async fn view_totals(&self, owner_id: Uuid) -> Result<ViewTotals> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS article_count, COALESCE(SUM(views), 0) AS total_views \
             FROM articles WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;

        Ok(ViewTotals {
            article_count: row.try_get("article_count").map_err(internal)?,
            total_views: row.try_get("total_views").map_err(internal)?,
        })
    }
}
