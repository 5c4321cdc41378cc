//! # SQLite store
//!
//! One `SqliteStore` implements every repository port over a shared sqlx pool.
//! Queries are plain `sqlx::query` with binds; rows are mapped by hand.

mod api_keys;
mod articles;
mod sessions;
mod stats;
mod users;

use std::str::FromStr;

use domains::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{error, info};

/// Failures while opening the database. Query failures map to `DomainError`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database url: {0}")]
    Url(#[source] sqlx::Error),

    #[error("could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    ///
    /// An in-memory database lives only as long as its connection, so it is
    /// pinned to a single connection that never expires.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Url)?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(in_memory, "sqlite store ready");

        Ok(Self { pool })
    }

    /// Shortcut used by tests and the seeder.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Maps a query failure, turning unique-constraint violations into `Conflict`.
pub(crate) fn db_error(conflict: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict(conflict),
        _ => internal(e),
    }
}

pub(crate) fn internal(e: sqlx::Error) -> DomainError {
    error!(error = %e, "database error");
    DomainError::internal("database error")
}
