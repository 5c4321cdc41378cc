//! # rusty-press server
//!
//! Loads configuration, installs logging, opens the store and serves the
//! router until Ctrl-C.

#[cfg(not(all(feature = "web-axum", feature = "db-sqlite")))]
compile_error!("rusty-press needs the `web-axum` and `db-sqlite` features");

use std::sync::Arc;

use anyhow::Context;
use api_adapters::http::{router, AppState, SessionSettings};
use auth_adapters::{Argon2Hasher, RandomTokens};
use configs::{AppConfig, LogConfig};
use secrecy::ExposeSecret;
use storage_adapters::SqliteStore;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log)?;

    let store = SqliteStore::connect(
        config.database.url.expose_secret(),
        config.database.max_connections,
    )
    .await
    .context("opening database")?;

    let session = SessionSettings {
        cookie_name: config.session.cookie_name.clone(),
        ttl: chrono::Duration::hours(config.session.ttl_hours.into()),
        secure_cookie: config.session.secure_cookie,
    };
    let state = AppState::new(
        Arc::new(store),
        Arc::new(Argon2Hasher),
        Arc::new(RandomTokens),
        session,
    );
    let app = router(state, &config.server.static_dir);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "rusty-press listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("shut down cleanly");
    Ok(())
}

/// `RUST_LOG` wins over `log.filter` when set.
fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .with_context(|| format!("invalid log filter {:?}", log.filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
