//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Services only ever see `Arc<dyn Port>`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
    ApiKey, Article, ArticlePatch, DailyStat, NewApiKey, NewArticle, NewUser, ProfileUpdate,
    Session, User, UserCredentials, ViewTotals,
};

/// Persistence contract for users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Returns the user plus password hash, for login only.
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>>;
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User>;
}

/// Persistence contract for articles. Every query is scoped to an owner.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create_article(&self, article: NewArticle) -> Result<Article>;
    async fn get_article(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Article>>;
    async fn find_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Option<Article>>;
    /// Newest first.
    async fn list_articles(&self, owner_id: Uuid) -> Result<Vec<Article>>;
    /// Published only, newest first.
    async fn list_published(&self, owner_id: Uuid) -> Result<Vec<Article>>;
    async fn update_article(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: ArticlePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>>;
    /// Returns false when nothing matched.
    async fn delete_article(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;
    /// Highest lifetime views first.
    async fn top_articles(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Article>>;
    async fn view_totals(&self, owner_id: Uuid) -> Result<ViewTotals>;
}

/// Persistence contract for API keys.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create_key(&self, key: NewApiKey) -> Result<ApiKey>;
    /// Newest first.
    async fn list_keys(&self, owner_id: Uuid) -> Result<Vec<ApiKey>>;
    async fn delete_key(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>>;
    async fn touch_key(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<()>;
}

/// Persistence contract for login sessions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: Session) -> Result<()>;
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>>;
    async fn delete_session(&self, token_hash: &str) -> Result<()>;
    /// Removes every session expired at `now`, returning how many were dropped.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// The two counters touched by the view recorder, plus the analytics read.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ViewStatsRepository: Send + Sync {
    async fn increment_article_views(&self, article_id: Uuid) -> Result<()>;
    /// Upsert keyed on (article, day). `owner_id` is only written on insert.
    async fn increment_daily_views(
        &self,
        owner_id: Uuid,
        article_id: Uuid,
        day: NaiveDate,
    ) -> Result<()>;
    /// All rows for the owner with `from <= day <= to`.
    async fn daily_stats(&self, owner_id: Uuid, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<DailyStat>>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Random secrets and their stored digests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenGenerator: Send + Sync {
    /// A new plaintext API key, e.g. `sk_<48 hex chars>`.
    fn api_key(&self) -> Result<String>;
    /// A new plaintext session token for the cookie.
    fn session_token(&self) -> Result<String>;
    /// Stable digest used as the lookup key for keys and sessions.
    fn digest(&self, secret: &str) -> String;
}
