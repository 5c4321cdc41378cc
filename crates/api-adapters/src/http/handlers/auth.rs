use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use domains::User;
use serde::Deserialize;
use serde_json::{json, Value};
use services::accounts::{Registration, INVALID_CREDENTIALS};

use crate::http::error::{ApiError, ApiResult};
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterBody>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state
        .accounts
        .register(Registration {
            name: body.name,
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user_id": user.id })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginBody>, ApiError>,
) -> ApiResult<(CookieJar, Json<User>)> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let now = Utc::now();
    let login = state.accounts.login(&email, &password, now).await?;

    // Expires together with the stored session
    let max_age = (login.expires_at - now).num_seconds();
    let cookie = Cookie::build((state.session.cookie_name.clone(), login.token))
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.session.secure_cookie);

    Ok((jar.add(cookie), Json(login.user)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let name = state.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&name) {
        state.accounts.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build((name, "")).path("/"));
    Ok((jar, Json(json!({ "message": "Logged out" }))))
}
