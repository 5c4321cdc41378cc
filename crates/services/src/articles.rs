//! # ArticleService
//!
//! Owner-scoped article CRUD plus the read paths used by the public API and
//! blog pages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    Article, ArticlePatch, ArticleRepository, DomainError, NewArticle, Result, User,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::validation::{is_valid_slug, optional, required, slugify};

pub const SLUG_TAKEN: &str = "Slug already exists for this user";

/// Untrusted input for a new article.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

/// Untrusted partial update. For the optional text fields, `Some("")`
/// clears the value.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub articles: Vec<Article>,
}

/// Who is looking at a blog page, if anyone is logged in.
#[derive(Debug, Clone, Copy)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Article>> {
        self.articles.list_articles(owner_id).await
    }

    pub async fn overview(&self, owner_id: Uuid) -> Result<Overview> {
        let articles = self.articles.list_articles(owner_id).await?;
        let published = articles.iter().filter(|a| a.published).count();
        Ok(Overview {
            total: articles.len(),
            published,
            drafts: articles.len() - published,
            articles,
        })
    }

    #[tracing::instrument(skip(self, draft), level = "debug")]
    pub async fn create(&self, owner_id: Uuid, draft: ArticleDraft) -> Result<Article> {
        let title = required(draft.title.as_deref(), "Please provide a title")?;
        let content = required(draft.content.as_deref(), "Please provide content")?;

        // A blank slug falls back to one derived from the title
        let slug = match optional(draft.slug) {
            Some(slug) => slug,
            None => slugify(&title),
        };
        if !is_valid_slug(&slug) {
            return Err(DomainError::validation("Please provide a slug"));
        }

        if self.articles.find_by_slug(owner_id, &slug).await?.is_some() {
            return Err(DomainError::conflict(SLUG_TAKEN));
        }

        let article = self
            .articles
            .create_article(NewArticle {
                owner_id,
                slug,
                title,
                content,
                summary: optional(draft.summary),
                image_url: optional(draft.image_url),
                published: draft.published.unwrap_or(false),
            })
            .await?;

        info!(article_id = %article.id, slug = %article.slug, "article created");
        Ok(article)
    }

    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Article> {
        self.articles
            .get_article(owner_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("article", id))
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: ArticleChanges,
        now: DateTime<Utc>,
    ) -> Result<Article> {
        let current = self.get(owner_id, id).await?;
        let patch = self.validate_changes(&current, changes).await?;

        self.articles
            .update_article(owner_id, id, patch, now)
            .await?
            .ok_or_else(|| DomainError::not_found("article", id))
    }

    async fn validate_changes(
        &self,
        current: &Article,
        changes: ArticleChanges,
    ) -> Result<ArticlePatch> {
        let title = match changes.title {
            Some(t) => Some(required(Some(t.as_str()), "Please provide a title")?),
            None => None,
        };
        let content = match changes.content {
            Some(c) => Some(required(Some(c.as_str()), "Please provide content")?),
            None => None,
        };

        let slug = match changes.slug.map(|s| s.trim().to_string()) {
            Some(slug) if slug == current.slug => None,
            Some(slug) => {
                if !is_valid_slug(&slug) {
                    return Err(DomainError::validation("Please provide a slug"));
                }
                let clash = self.articles.find_by_slug(current.owner_id, &slug).await?;
                if clash.is_some_and(|other| other.id != current.id) {
                    return Err(DomainError::conflict(SLUG_TAKEN));
                }
                Some(slug)
            }
            None => None,
        };

        Ok(ArticlePatch {
            title,
            slug,
            content,
            summary: changes.summary.map(|s| optional(Some(s))),
            image_url: changes.image_url.map(|s| optional(Some(s))),
            published: changes.published,
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        if self.articles.delete_article(owner_id, id).await? {
            info!(article_id = %id, "article deleted");
            Ok(())
        } else {
            Err(DomainError::not_found("article", id))
        }
    }

    /// Published articles of `owner_id`, newest first.
    pub async fn published(&self, owner_id: Uuid) -> Result<Vec<Article>> {
        self.articles.list_published(owner_id).await
    }

    /// A published article by slug; drafts are reported as missing.
    pub async fn published_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Article> {
        match self.articles.find_by_slug(owner_id, slug).await? {
            Some(article) if article.published => Ok(article),
            _ => Err(DomainError::not_found("article", slug)),
        }
    }

    /// An article on `author`'s blog as `viewer` may see it. Drafts are only
    /// visible to their owner.
    pub async fn for_blog(&self, author: &User, slug: &str, viewer: Viewer) -> Result<Article> {
        let article = self
            .articles
            .find_by_slug(author.id, slug)
            .await?
            .ok_or_else(|| DomainError::not_found("article", slug))?;

        match viewer {
            _ if article.published => Ok(article),
            Viewer::User(id) if id == author.id => Ok(article),
            _ => Err(DomainError::not_found("article", slug)),
        }
    }
}
