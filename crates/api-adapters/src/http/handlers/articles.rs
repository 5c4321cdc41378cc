//! Dashboard CRUD over the caller's own articles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::Utc;
use domains::Article;
use serde::Deserialize;
use serde_json::{json, Value};
use services::articles::{ArticleChanges, ArticleDraft};
use uuid::Uuid;

use crate::http::error::{ApiError, ApiResult};
use crate::http::extractors::SessionUser;
use crate::http::state::AppState;

/// Create and update share one body; every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleBody {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.articles.list(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Json(body), _): WithRejection<Json<ArticleBody>, ApiError>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let article = state
        .articles
        .create(
            user.id,
            ArticleDraft {
                title: body.title,
                slug: body.slug,
                content: body.content,
                summary: body.summary,
                image_url: body.image_url,
                published: body.published,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn show(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Article>> {
    Ok(Json(state.articles.get(user.id, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
    WithRejection(Json(body), _): WithRejection<Json<ArticleBody>, ApiError>,
) -> ApiResult<Json<Article>> {
    let changes = ArticleChanges {
        title: body.title,
        slug: body.slug,
        content: body.content,
        summary: body.summary,
        image_url: body.image_url,
        published: body.published,
    };
    Ok(Json(
        state.articles.update(user.id, id, changes, Utc::now()).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state.articles.delete(user.id, id).await?;
    Ok(Json(json!({ "message": "Deleted" })))
}
