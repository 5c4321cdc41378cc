use axum::http::{header, StatusCode};
use domains::ArticleRepository;
use integration_tests::TestApp;
use uuid::Uuid;

#[tokio::test]
async fn landing_page_renders() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.text().contains("<html"));
}

#[tokio::test]
async fn profile_lists_published_articles_only() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let live = app.article(&author, "live-one", true).await;
    let draft = app.article(&author, "draft-one", false).await;

    let response = app.get(&format!("/{}", author.username)).await;
    assert_eq!(response.status, StatusCode::OK);

    let html = response.text();
    assert!(html.contains("live-one"));
    assert!(!html.contains("draft-one"));
    assert!(html.contains(live["title"].as_str().unwrap()));
    assert!(!html.contains(draft["title"].as_str().unwrap()));
}

#[tokio::test]
async fn unknown_pages_are_404_html() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let user = app.get("/nobody_here").await;
    assert_eq!(user.status, StatusCode::NOT_FOUND);
    assert!(user.text().contains("User not found"));

    let article = app.get(&format!("/{}/missing", author.username)).await;
    assert_eq!(article.status, StatusCode::NOT_FOUND);
    assert!(article.text().contains("Article not found"));

    let deep = app.get("/a/b/c").await;
    assert_eq!(deep.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn published_reads_are_counted() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let article = app.article(&author, "read-me", true).await;
    let id: Uuid = article["id"].as_str().unwrap().parse().unwrap();
    let uri = format!("/{}/read-me", author.username);

    let anonymous = app.get(&uri).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(anonymous.text().contains("min read"));
    assert!(!anonymous.text().contains("Draft preview"));

    // The owner reading a published article counts too
    assert_eq!(app.get_as(&author, &uri).await.status, StatusCode::OK);

    let stored = app.store.get_article(author.id, id).await.unwrap().unwrap();
    assert_eq!(stored.views, 2);
}

#[tokio::test]
async fn drafts_are_previewed_by_their_owner_only() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let stranger = app.author().await;
    let article = app.article(&author, "wip", false).await;
    let id: Uuid = article["id"].as_str().unwrap().parse().unwrap();
    let uri = format!("/{}/wip", author.username);

    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get_as(&stranger, &uri).await.status, StatusCode::NOT_FOUND);

    let preview = app.get_as(&author, &uri).await;
    assert_eq!(preview.status, StatusCode::OK);
    assert!(preview
        .text()
        .contains("Draft preview: only you can see this article."));

    let stored = app.store.get_article(author.id, id).await.unwrap().unwrap();
    assert_eq!(stored.views, 0);
}

#[tokio::test]
async fn health_and_metrics() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    app.article(&author, "metered", true).await;

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");

    app.get(&format!("/{}/metered", author.username)).await;

    let metrics = app.get("/metrics").await;
    assert_eq!(metrics.status, StatusCode::OK);
    let body = metrics.text();
    assert!(body.contains("views_recorded_total 1"), "{body}");
    assert!(body.contains("view_tracking_failures_total 0"), "{body}");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert!(response.headers.contains_key("x-request-id"));
}
