//! # ApiKeyService
//!
//! Minting, listing and revoking API keys, and resolving an `X-API-KEY`
//! header to its owner. Only a digest of each key is stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{ApiKey, ApiKeyRepository, DomainError, NewApiKey, Result, TokenGenerator};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::validation::required;

/// Characters of the plaintext key kept for display ("sk_1a2b3c4").
pub const PREFIX_LEN: usize = 10;

pub const INVALID_KEY: &str = "Invalid API Key";

/// Returned once, right after creation.
#[derive(Debug, Clone, Serialize)]
pub struct MintedKey {
    #[serde(flatten)]
    pub record: ApiKey,
    pub key: String,
}

#[derive(Clone)]
pub struct ApiKeyService {
    keys: Arc<dyn ApiKeyRepository>,
    tokens: Arc<dyn TokenGenerator>,
}

impl ApiKeyService {
    pub fn new(keys: Arc<dyn ApiKeyRepository>, tokens: Arc<dyn TokenGenerator>) -> Self {
        Self { keys, tokens }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<ApiKey>> {
        self.keys.list_keys(owner_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn create(&self, owner_id: Uuid, name: Option<String>) -> Result<MintedKey> {
        let name = required(name.as_deref(), "Name is required")?;

        let key = self.tokens.api_key()?;
        let record = self
            .keys
            .create_key(NewApiKey {
                owner_id,
                name,
                prefix: key.chars().take(PREFIX_LEN).collect(),
                key_hash: self.tokens.digest(&key),
            })
            .await?;

        info!(key_id = %record.id, "api key created");
        Ok(MintedKey { record, key })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        if self.keys.delete_key(owner_id, id).await? {
            info!(key_id = %id, "api key revoked");
            Ok(())
        } else {
            Err(DomainError::not_found("api key", id))
        }
    }

    /// Looks the key up by digest and stamps `last_used`.
    pub async fn authenticate(&self, raw_key: &str, now: DateTime<Utc>) -> Result<ApiKey> {
        let key = self
            .keys
            .find_by_hash(&self.tokens.digest(raw_key.trim()))
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_KEY))?;

        // A stale timestamp is not worth refusing the request over
        if let Err(e) = self.keys.touch_key(key.id, now).await {
            warn!(key_id = %key.id, error = %e, "could not update last_used");
        }
        Ok(key)
    }
}
