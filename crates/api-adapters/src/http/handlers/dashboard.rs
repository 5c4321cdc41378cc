use axum::extract::State;
use axum::Json;
use chrono::Utc;
use services::analytics::AnalyticsReport;
use services::articles::Overview;

use crate::http::error::ApiResult;
use crate::http::extractors::SessionUser;
use crate::http::state::AppState;

pub async fn overview(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> ApiResult<Json<Overview>> {
    Ok(Json(state.articles.overview(user.id).await?))
}

/// Seven-day series, week-over-week trend and top articles.
pub async fn analytics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> ApiResult<Json<AnalyticsReport>> {
    Ok(Json(state.analytics.report(user.id, Utc::now()).await?))
}
