use std::sync::Arc;

use domains::{
    ApiKeyRepository, ArticleRepository, PasswordHasher, SessionRepository, TokenGenerator,
    UserRepository, ViewStatsRepository,
};
use services::{
    AccountService, AnalyticsService, ApiKeyService, ArticleService, ViewRecorder,
};

use crate::metrics::Metrics;

/// Cookie settings for dashboard sessions.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl: chrono::Duration,
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "rp_session".into(),
            ttl: chrono::Duration::hours(168),
            secure_cookie: false,
        }
    }
}

/// Everything a handler may touch. Built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub articles: ArticleService,
    pub api_keys: ApiKeyService,
    pub analytics: AnalyticsService,
    pub views: ViewRecorder,
    pub metrics: Arc<Metrics>,
    pub session: Arc<SessionSettings>,
}

impl AppState {
    /// Wires every service against a single store that implements all the
    /// repository ports.
    pub fn new<S>(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenGenerator>,
        session: SessionSettings,
    ) -> Self
    where
        S: UserRepository
            + ArticleRepository
            + ApiKeyRepository
            + SessionRepository
            + ViewStatsRepository
            + 'static,
    {
        Self {
            accounts: AccountService::new(
                store.clone(),
                store.clone(),
                hasher,
                tokens.clone(),
                session.ttl,
            ),
            articles: ArticleService::new(store.clone()),
            api_keys: ApiKeyService::new(store.clone(), tokens),
            analytics: AnalyticsService::new(store.clone(), store.clone()),
            views: ViewRecorder::new(store),
            metrics: Arc::new(Metrics::new()),
            session: Arc::new(session),
        }
    }
}
