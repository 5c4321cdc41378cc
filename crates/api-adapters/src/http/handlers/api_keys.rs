use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use domains::ApiKey;
use serde::Deserialize;
use serde_json::{json, Value};
use services::api_keys::MintedKey;
use uuid::Uuid;

use crate::http::error::{ApiError, ApiResult};
use crate::http::extractors::SessionUser;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct KeyBody {
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> ApiResult<Json<Vec<ApiKey>>> {
    Ok(Json(state.api_keys.list(user.id).await?))
}

/// The only response that ever carries the plaintext key.
pub async fn create(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Json(body), _): WithRejection<Json<KeyBody>, ApiError>,
) -> ApiResult<(StatusCode, Json<MintedKey>)> {
    let minted = state.api_keys.create(user.id, body.name).await?;
    Ok((StatusCode::CREATED, Json(minted)))
}

pub async fn delete(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state.api_keys.delete(user.id, id).await?;
    Ok(Json(json!({ "message": "Deleted" })))
}
