//! The API-key gated read API used by external sites.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use domains::{Article, ArticleSummary, DomainError};
use serde::Serialize;

use crate::http::error::{ApiError, ApiResult};
use crate::http::extractors::ApiKeyOwner;
use crate::http::state::AppState;

pub const ARTICLE_NOT_FOUND: &str = "Article not found";

#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub object: &'static str,
    pub count: usize,
    pub data: Vec<ArticleSummary>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiKeyOwner(key): ApiKeyOwner,
) -> ApiResult<Json<ArticleList>> {
    let data: Vec<ArticleSummary> = state
        .articles
        .published(key.owner_id)
        .await?
        .iter()
        .map(ArticleSummary::from)
        .collect();

    Ok(Json(ArticleList {
        object: "list",
        count: data.len(),
        data,
    }))
}

/// Serves one published article and counts the read.
pub async fn show(
    State(state): State<AppState>,
    ApiKeyOwner(key): ApiKeyOwner,
    Path(slug): Path<String>,
) -> ApiResult<Json<Article>> {
    let article = state
        .articles
        .published_by_slug(key.owner_id, &slug)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => ApiError::not_found(ARTICLE_NOT_FOUND),
            other => other.into(),
        })?;

    let outcome = state
        .views
        .record_view(article.owner_id, article.id, Utc::now())
        .await;
    state.metrics.observe(outcome);

    Ok(Json(article))
}
