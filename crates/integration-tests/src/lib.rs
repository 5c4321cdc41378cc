//! # integration-tests
//!
//! Drives the real axum router over an in-memory SQLite store.
//! Each `TestApp` owns its own database.

use std::sync::Arc;

use api_adapters::http::{router, AppState, SessionSettings};
use auth_adapters::RandomTokens;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use domains::{DomainError, PasswordHasher};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use storage_adapters::SqliteStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const COOKIE: &str = "rp_session";
pub const PASSWORD: &str = "correct horse battery staple";

/// Argon2 is too slow for every test login; this keeps the port contract.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }

    /// `name=value` of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{COOKIE}=")))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

/// A registered, logged-in author.
#[derive(Debug, Clone)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub cookie: String,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(SqliteStore::in_memory().await.expect("in-memory store"));
        let state = AppState::new(
            store.clone(),
            Arc::new(PlainHasher),
            Arc::new(RandomTokens),
            SessionSettings::default(),
        );
        let router = router(state.clone(), "static");
        Self {
            router,
            store,
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, &[]).await
    }

    pub async fn get_as(&self, author: &Author, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, &[("cookie", author.cookie.as_str())])
            .await
    }

    pub async fn get_with_key(&self, key: &str, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, &[("x-api-key", key)]).await
    }

    pub async fn post_as(&self, author: &Author, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), &[("cookie", author.cookie.as_str())])
            .await
    }

    pub async fn put_as(&self, author: &Author, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), &[("cookie", author.cookie.as_str())])
            .await
    }

    pub async fn delete_as(&self, author: &Author, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, &[("cookie", author.cookie.as_str())])
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), &[]).await
    }

    /// Registers a fresh user with fake data and logs them in.
    pub async fn author(&self) -> Author {
        let username = format!("user_{}", &Uuid::new_v4().simple().to_string()[..10]);
        let email = format!("{username}@example.com");
        let name: String = Name().fake();

        let registered = self
            .post_json(
                "/api/auth/register",
                json!({ "name": name, "email": email, "username": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.text());
        let id = registered.json()["user_id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("user_id in response");

        let login = self
            .post_json("/api/auth/login", json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text());

        Author {
            id,
            username,
            email,
            cookie: login.session_cookie().expect("session cookie"),
        }
    }

    /// Creates an article through the dashboard API and returns its JSON.
    pub async fn article(&self, author: &Author, slug: &str, published: bool) -> Value {
        let title: String = Sentence(3..6).fake();
        let content: String = Paragraph(2..4).fake();
        let response = self
            .post_as(
                author,
                "/api/articles",
                json!({
                    "title": title,
                    "slug": slug,
                    "content": format!("<p>{content}</p>"),
                    "published": published,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    /// Mints an API key for `author` and returns the plaintext.
    pub async fn api_key(&self, author: &Author) -> String {
        let response = self
            .post_as(author, "/api/keys", json!({ "name": "test site" }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["key"]
            .as_str()
            .expect("plaintext key")
            .to_string()
    }
}
