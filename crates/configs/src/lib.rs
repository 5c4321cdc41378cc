//! # configs
//!
//! Layered settings for rusty-press: built-in defaults, then an optional
//! `config/rusty-press.toml`, then `RUSTY_PRESS_*` environment variables
//! (`__` separates nested keys, e.g. `RUSTY_PRESS_SERVER__PORT=3000`).

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE: &str = "config/rusty-press";
pub const ENV_PREFIX: &str = "RUSTY_PRESS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// May embed credentials for non-file backends, so it stays wrapped.
    #[serde(deserialize_with = "secret_string")]
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: u32,
    /// Adds the `Secure` attribute; enable behind TLS.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
    pub json: bool,
}

fn secret_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Builder pre-loaded with every default.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.static_dir", "static")?
        .set_default("database.url", "sqlite:rusty_press.db")?
        .set_default("database.max_connections", 5)?
        .set_default("session.cookie_name", "rp_session")?
        .set_default("session.ttl_hours", 168)?
        .set_default("session.secure_cookie", false)?
        .set_default("log.filter", "info")?
        .set_default("log.json", false)?)
}

impl AppConfig {
    /// Reads `.env` (if any), the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }

        let builder = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                key: "server.port",
                reason: "must be non-zero",
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "database.max_connections",
                reason: "must be at least 1",
            });
        }
        if self.session.ttl_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "session.ttl_hours",
                reason: "must be at least 1",
            });
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "session.cookie_name",
                reason: "must not be blank",
            });
        }
        Ok(())
    }
}
