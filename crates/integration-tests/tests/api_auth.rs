use axum::http::{header, StatusCode};
use integration_tests::{TestApp, COOKIE, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn register_requires_every_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/auth/register",
            json!({ "name": "Jane", "email": "jane@example.com", "password": "pw" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Missing required fields");
}

#[tokio::test]
async fn register_rejects_bad_usernames() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/auth/register",
            json!({ "name": "Jane", "email": "jane@example.com", "username": "jane doe", "password": "pw" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username is invalid");

    for taken_by_a_route in ["health", "metrics", "api", "static"] {
        let response = app
            .post_json(
                "/api/auth/register",
                json!({ "name": "Jane", "email": "jane@example.com", "username": taken_by_a_route, "password": "pw" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{taken_by_a_route}");
        assert_eq!(response.message(), "Username is invalid");
    }

    let health = app.get("/health").await;
    assert_eq!(health.json()["status"], "ok");
}

#[tokio::test]
async fn duplicate_email_then_username_are_rejected() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let same_email = app
        .post_json(
            "/api/auth/register",
            json!({ "name": "X", "email": author.email, "username": "someone_else", "password": "pw" }),
        )
        .await;
    assert_eq!(same_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_email.message(), "Email already exists");

    let same_username = app
        .post_json(
            "/api/auth/register",
            json!({ "name": "X", "email": "fresh@example.com", "username": author.username, "password": "pw" }),
        )
        .await;
    assert_eq!(same_username.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_username.message(), "Username already taken");
}

#[tokio::test]
async fn login_sets_an_http_only_cookie() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "email": author.email, "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["username"], author.username.as_str());
    assert!(response.json().get("password_hash").is_none());

    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with(&format!("{COOKIE}=")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    // Lasts as long as the stored session, 168h by default
    assert!(set_cookie.contains("Max-Age=604800"), "{set_cookie}");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "email": author.email, "password": "nope" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid credentials");
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn dashboard_routes_need_a_session() {
    let app = TestApp::spawn().await;

    for uri in ["/api/articles", "/api/keys", "/api/dashboard", "/api/analytics", "/api/user/settings"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.message(), "Unauthorized");
    }

    let forged = app
        .request(
            axum::http::Method::GET,
            "/api/articles",
            None,
            &[("cookie", "rp_session=not-a-real-token")],
        )
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    assert_eq!(app.get_as(&author, "/api/articles").await.status, StatusCode::OK);

    let response = app
        .request(
            axum::http::Method::POST,
            "/api/auth/logout",
            None,
            &[("cookie", author.cookie.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(
        app.get_as(&author, "/api/articles").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn settings_round_trip() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let updated = app
        .put_as(
            &author,
            "/api/user/settings",
            json!({ "name": "Jane Writer", "bio": "Rust and tea", "github": "https://github.com/jane", "twitter": "" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.text());

    let profile = app.get_as(&author, "/api/user/settings").await.json();
    assert_eq!(profile["name"], "Jane Writer");
    assert_eq!(profile["bio"], "Rust and tea");
    assert_eq!(profile["social_links"]["github"], "https://github.com/jane");
    assert!(profile["social_links"]["twitter"].is_null());
    assert!(profile.get("password_hash").is_none());

    let blank_name = app
        .put_as(&author, "/api/user/settings", json!({ "name": "  " }))
        .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank_name.message(), "Please provide a name");
}
