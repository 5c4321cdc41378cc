//! # seed
//!
//! Fills the configured database with a demo author, a few articles and a
//! fresh API key. Safe to run more than once.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2Hasher, RandomTokens};
use chrono::Duration;
use configs::AppConfig;
use domains::DomainError;
use secrecy::ExposeSecret;
use services::accounts::Registration;
use services::articles::ArticleDraft;
use services::{AccountService, ApiKeyService, ArticleService};
use storage_adapters::SqliteStore;
use tracing::{info, warn};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo";

struct SeedArticle {
    title: &'static str,
    summary: &'static str,
    content: &'static str,
    published: bool,
}

const ARTICLES: [SeedArticle; 3] = [
    SeedArticle {
        title: "Hello, rusty-press",
        summary: "What this blog is about.",
        content: "<p>Welcome! This article was published by the seed tool.</p>",
        published: true,
    },
    SeedArticle {
        title: "Using the API",
        summary: "Fetch articles with an X-API-KEY header.",
        content: "<p>Send <code>X-API-KEY</code> to <code>/api/v1/articles</code> \
                  to list everything published here.</p>",
        published: true,
    },
    SeedArticle {
        title: "Work in progress",
        summary: "A draft only the author can preview.",
        content: "<p>Not ready yet.</p>",
        published: false,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = Arc::new(
        SqliteStore::connect(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await
        .context("opening database")?,
    );
    let tokens = Arc::new(RandomTokens);

    let accounts = AccountService::new(
        store.clone(),
        store.clone(),
        Arc::new(Argon2Hasher),
        tokens.clone(),
        Duration::hours(config.session.ttl_hours.into()),
    );
    let articles = ArticleService::new(store.clone());
    let keys = ApiKeyService::new(store, tokens);

    let registration = Registration {
        name: Some("Demo Author".into()),
        email: Some(DEMO_EMAIL.into()),
        username: Some(DEMO_USERNAME.into()),
        password: Some(DEMO_PASSWORD.into()),
    };
    let user = match accounts.register(registration).await {
        Ok(user) => user,
        Err(DomainError::Conflict(_)) => {
            info!("demo user already exists");
            accounts.find_by_username(DEMO_USERNAME).await?
        }
        Err(e) => return Err(e).context("creating demo user"),
    };

    for seed in &ARTICLES {
        let draft = ArticleDraft {
            title: Some(seed.title.into()),
            slug: None,
            content: Some(seed.content.into()),
            summary: Some(seed.summary.into()),
            image_url: None,
            published: Some(seed.published),
        };
        match articles.create(user.id, draft).await {
            Ok(article) => info!(slug = %article.slug, "article created"),
            Err(DomainError::Conflict(_)) => warn!(title = seed.title, "article exists, skipped"),
            Err(e) => return Err(e).context("creating article"),
        }
    }

    let minted = keys
        .create(user.id, Some("seed".into()))
        .await
        .context("minting api key")?;

    println!("login:    {DEMO_EMAIL} / {DEMO_PASSWORD}");
    println!("blog:     /{DEMO_USERNAME}");
    println!("api key:  {}", minted.key);
    Ok(())
}
