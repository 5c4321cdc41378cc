pub mod api_keys;
pub mod articles;
pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod public_api;
pub mod settings;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

const OPENMETRICS: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state
        .metrics
        .render()
        .map_err(|_| ApiError::from(domains::DomainError::internal("metrics encoding failed")))?;
    Ok(([(CONTENT_TYPE, OPENMETRICS)], body))
}
