use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use domains::{ArticleRepository, ViewStatsRepository};
use integration_tests::TestApp;
use uuid::Uuid;

#[tokio::test]
async fn missing_or_unknown_keys_are_rejected() {
    let app = TestApp::spawn().await;

    let missing = app.get("/api/v1/articles").await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.message(), "Missing X-API-KEY header");

    let blank = app.get_with_key("   ", "/api/v1/articles").await;
    assert_eq!(blank.message(), "Missing X-API-KEY header");

    let unknown = app.get_with_key("sk_not_a_key", "/api/v1/articles").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.message(), "Invalid API Key");
}

#[tokio::test]
async fn list_has_only_the_owners_published_articles() {
    let app = TestApp::spawn().await;
    let jane = app.author().await;
    let john = app.author().await;
    app.article(&jane, "live", true).await;
    app.article(&jane, "draft", false).await;
    app.article(&john, "elsewhere", true).await;
    let key = app.api_key(&jane).await;

    let response = app.get_with_key(&key, "/api/v1/articles").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["object"], "list");
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["slug"], "live");
    assert!(body["data"][0].get("content").is_none());
}

#[tokio::test]
async fn reading_an_article_counts_a_view() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let article = app.article(&author, "counted", true).await;
    let key = app.api_key(&author).await;

    for _ in 0..3 {
        let response = app.get_with_key(&key, "/api/v1/articles/counted").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.json()["content"].as_str().is_some());
    }

    let id: Uuid = article["id"].as_str().unwrap().parse().unwrap();
    let stored = app.store.get_article(author.id, id).await.unwrap().unwrap();
    assert_eq!(stored.views, 3);

    // Reads straddling midnight may split across two days
    let today = Utc::now().date_naive();
    let rows = app
        .store
        .daily_stats(author.id, today - Duration::days(1), today)
        .await
        .unwrap();
    assert!(rows.iter().all(|row| row.article_id == id));
    assert_eq!(rows.iter().map(|row| row.views).sum::<i64>(), 3);
}

#[tokio::test]
async fn drafts_and_other_authors_are_not_found() {
    let app = TestApp::spawn().await;
    let jane = app.author().await;
    let john = app.author().await;
    app.article(&jane, "secret", false).await;
    app.article(&john, "johns", true).await;
    let key = app.api_key(&jane).await;

    for uri in ["/api/v1/articles/secret", "/api/v1/articles/johns", "/api/v1/articles/nope"] {
        let response = app.get_with_key(&key, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.message(), "Article not found");
    }
}

#[tokio::test]
async fn using_a_key_stamps_last_used() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let key = app.api_key(&author).await;

    let before = app.get_as(&author, "/api/keys").await.json();
    assert!(before[0]["last_used"].is_null());

    app.get_with_key(&key, "/api/v1/articles").await;

    let after = app.get_as(&author, "/api/keys").await.json();
    assert!(after[0]["last_used"].is_string());
}

#[tokio::test]
async fn cross_origin_reads_are_allowed() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let key = app.api_key(&author).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/articles",
            None,
            &[("x-api-key", key.as_str()), ("origin", "https://someones.site")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["access-control-allow-origin"], "*");
}
