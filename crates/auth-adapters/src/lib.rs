//! # auth-adapters
//!
//! Argon2 password hashing and SHA-256 backed token handling.
//! Implements the `PasswordHasher` and `TokenGenerator` ports.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use domains::{DomainError, PasswordHasher, Result, TokenGenerator};
use sha2::{Digest, Sha256};
use tracing::error;

/// Plaintext API keys start with this.
pub const API_KEY_PREFIX: &str = "sk_";

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(|e| {
        error!(error = %e, "os random source failed");
        DomainError::internal("random source unavailable")
    })?;
    Ok(buf)
}

#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::encode_b64(&random_bytes::<16>()?)
            .map_err(|e| DomainError::internal(format!("salt encoding: {e}")))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("password hashing: {e}")))
    }

    /// Malformed stored hashes simply fail verification.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[derive(Debug, Default, Clone)]
pub struct RandomTokens;

impl TokenGenerator for RandomTokens {
    /// `sk_` followed by 48 hex characters.
    fn api_key(&self) -> Result<String> {
        Ok(format!("{API_KEY_PREFIX}{}", hex::encode(random_bytes::<24>()?)))
    }

    fn session_token(&self) -> Result<String> {
        Ok(hex::encode(random_bytes::<32>()?))
    }

    fn digest(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}
