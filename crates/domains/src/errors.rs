//! # DomainError
//!
//! Centralized error handling for the rusty-press ecosystem.
//! Adapters translate their native failures into these variants so the HTTP
//! layer only ever matches on one type.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found (e.g., Article, ApiKey, User)
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Validation failure (e.g., blank title, malformed username)
    #[error("{0}")]
    Validation(String),

    /// Resource already exists (e.g., duplicate slug for the same owner)
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials, session or API key
    #[error("{0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., database unavailable)
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DomainError::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal(message.into())
    }
}

/// A specialized Result type for rusty-press logic.
pub type Result<T> = std::result::Result<T, DomainError>;
