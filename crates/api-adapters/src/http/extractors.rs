//! Request gates: the dashboard session cookie and the public `X-API-KEY`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use domains::{ApiKey, User};
use services::accounts::UNAUTHORIZED;
use tracing::debug;

use super::error::ApiError;
use super::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const MISSING_API_KEY: &str = "Missing X-API-KEY header";

fn session_token(parts: &Parts, state: &AppState) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(&state.session.cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

/// The logged-in user behind the session cookie. Rejects with 401.
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, state).ok_or(ApiError::unauthorized(UNAUTHORIZED))?;
        let user = state.accounts.authenticate(&token, Utc::now()).await?;
        Ok(SessionUser(user))
    }
}

/// Like [`SessionUser`] but never rejects; used by public pages.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts, state) else {
            return Ok(MaybeUser(None));
        };
        match state.accounts.authenticate(&token, Utc::now()).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(e) => {
                debug!(error = %e, "ignoring stale session cookie");
                Ok(MaybeUser(None))
            }
        }
    }
}

/// The key presented in `X-API-KEY`, already resolved and stamped.
#[derive(Debug, Clone)]
pub struct ApiKeyOwner(pub ApiKey);

impl FromRequestParts<AppState> for ApiKeyOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::unauthorized(MISSING_API_KEY))?;

        let key = state.api_keys.authenticate(raw, Utc::now()).await?;
        Ok(ApiKeyOwner(key))
    }
}
