//! JSON error responses. Every failure leaves as `{ "message": "..." }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A fixed status and public message, e.g. the public API's wording.
    #[error("{1}")]
    Status(StatusCode, &'static str),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl ApiError {
    pub fn unauthorized(message: &'static str) -> Self {
        ApiError::Status(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: &'static str) -> Self {
        ApiError::Status(StatusCode::NOT_FOUND, message)
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Domain(DomainError::Validation(m) | DomainError::Conflict(m)) => {
                (StatusCode::BAD_REQUEST, m.clone())
            }
            ApiError::Domain(DomainError::Unauthorized(m)) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::Domain(DomainError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Not found".into())
            }
            ApiError::Domain(DomainError::Internal(_)) | ApiError::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".into(),
            ),
            ApiError::Status(status, m) => (*status, (*m).into()),
            ApiError::Body(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), %message, "request rejected");
        }
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
