use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;
use domains::User;
use serde::Deserialize;
use services::accounts::ProfileForm;

use crate::http::error::{ApiError, ApiResult};
use crate::http::extractors::SessionUser;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

pub async fn show(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> ApiResult<Json<User>> {
    Ok(Json(state.accounts.profile(user.id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Json(body), _): WithRejection<Json<SettingsBody>, ApiError>,
) -> ApiResult<Json<User>> {
    let form = ProfileForm {
        name: body.name,
        image: body.image,
        bio: body.bio,
        twitter: body.twitter,
        github: body.github,
        website: body.website,
    };
    Ok(Json(state.accounts.update_profile(user.id, form).await?))
}
