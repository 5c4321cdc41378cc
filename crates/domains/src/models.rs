//! # Domain Models
//!
//! These structs represent the core entities of rusty-press.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional links rendered on a user's public blog header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

/// A registered author. The password hash never lives on this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Public handle used in blog URLs (e.g., "/jane")
    pub username: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub social_links: SocialLinks,
    pub created_at: DateTime<Utc>,
}

/// A user row together with its stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Profile fields a user may change from the settings page.
/// `None` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub social_links: SocialLinks,
}

/// An article owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// URL-safe identifier, unique per owner
    pub slug: String,
    pub title: String,
    /// Rich-text HTML produced by the editor
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
    /// Lifetime view counter, only ever incremented by the view recorder
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub owner_id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

/// Partial update of an article. `views` is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the summary
    pub summary: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub published: Option<bool>,
}

impl ArticlePatch {
    /// Applies the patch on top of an existing article.
    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(slug) = self.slug {
            article.slug = slug;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(summary) = self.summary {
            article.summary = summary;
        }
        if let Some(image_url) = self.image_url {
            article.image_url = image_url;
        }
        if let Some(published) = self.published {
            article.published = published;
        }
    }
}

/// The projection served by the public list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub published: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        ArticleSummary {
            id: article.id,
            title: article.title.clone(),
            slug: article.slug.clone(),
            summary: article.summary.clone(),
            published: article.published,
            image_url: article.image_url.clone(),
            created_at: article.created_at,
        }
    }
}

/// Lifetime totals across all of one owner's articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTotals {
    pub article_count: i64,
    pub total_views: i64,
}

/// Per-day, per-article view counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub owner_id: Uuid,
    pub article_id: Uuid,
    /// UTC calendar day
    pub day: NaiveDate,
    pub views: i64,
}

/// A key that grants read access to one user's published articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    /// Leading characters of the plaintext key, safe to display
    pub prefix: String,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub owner_id: Uuid,
    pub name: String,
    pub prefix: String,
    pub key_hash: String,
}

/// Server-side login record. Only the token digest is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
