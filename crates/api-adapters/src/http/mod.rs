//! # HTTP layer (axum)
//!
//! `router` assembles every route plus the middleware stack:
//! request ids, tracing, compression, and CORS on the public API.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::body::Body;
use axum::http::{HeaderName, Method, Request};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use extractors::{ApiKeyOwner, MaybeUser, SessionUser};
pub use state::{AppState, SessionSettings};

use handlers::{api_keys, articles, auth, blog, dashboard, public_api, settings};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Read-only API for external sites: any origin, GET only.
fn public_api_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(public_api::list))
        .route("/articles/{slug}", get(public_api::show))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        )
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/articles", get(articles::list).post(articles::create))
        .route(
            "/articles/{id}",
            get(articles::show)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/dashboard", get(dashboard::overview))
        .route("/analytics", get(dashboard::analytics))
        .route("/keys", get(api_keys::list).post(api_keys::create))
        .route("/keys/{id}", delete(api_keys::delete))
        .route("/user/settings", get(settings::show).put(settings::update))
}

pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let api = dashboard_routes().nest("/v1", public_api_routes());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/", get(blog::landing))
        .route("/{username}", get(blog::profile))
        .route("/{username}/{slug}", get(blog::article))
        .fallback(blog::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(&REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::new(REQUEST_ID))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
