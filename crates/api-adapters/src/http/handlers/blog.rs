//! Server-rendered public blog pages.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use domains::DomainError;
use services::articles::Viewer;
use tracing::error;

use crate::http::extractors::MaybeUser;
use crate::http::state::AppState;
use crate::pages::{ArticlePage, BlogPage, ErrorPage, LandingPage, NotFoundPage};

/// Failures on HTML routes render a page instead of JSON.
pub enum PageError {
    NotFound(&'static str),
    Internal(String),
}

impl From<DomainError> for PageError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { resource: "user", .. } => PageError::NotFound("User not found"),
            DomainError::NotFound { .. } => PageError::NotFound("Article not found"),
            other => PageError::Internal(other.to_string()),
        }
    }
}

impl From<askama::Error> for PageError {
    fn from(e: askama::Error) -> Self {
        PageError::Internal(e.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, page) = match self {
            PageError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                NotFoundPage {
                    message: message.into(),
                }
                .render(),
            ),
            PageError::Internal(detail) => {
                error!(error = %detail, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorPage.render())
            }
        };
        match page {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "error page rendering failed");
                status.into_response()
            }
        }
    }
}

type PageResult = Result<Html<String>, PageError>;

pub async fn landing() -> PageResult {
    Ok(Html(LandingPage.render()?))
}

pub async fn profile(State(state): State<AppState>, Path(username): Path<String>) -> PageResult {
    let author = state.accounts.find_by_username(&username).await?;
    let articles = state.articles.published(author.id).await?;
    Ok(Html(BlogPage::new(&author, &articles).render()?))
}

/// Published reads are counted; owner previews of drafts are not.
pub async fn article(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path((username, slug)): Path<(String, String)>,
) -> PageResult {
    let author = state.accounts.find_by_username(&username).await?;
    let viewer = viewer.map_or(Viewer::Anonymous, |user| Viewer::User(user.id));
    let article = state.articles.for_blog(&author, &slug, viewer).await?;

    if article.published {
        let outcome = state
            .views
            .record_view(author.id, article.id, Utc::now())
            .await;
        state.metrics.observe(outcome);
    }

    Ok(Html(ArticlePage::new(&author, &article).render()?))
}

pub async fn not_found() -> PageError {
    PageError::NotFound("Page not found")
}
