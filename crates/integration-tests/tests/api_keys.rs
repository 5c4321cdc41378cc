use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn minting_returns_the_plaintext_once() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    let response = app
        .post_as(&author, "/api/keys", json!({ "name": "  My site " }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());

    let minted = response.json();
    let key = minted["key"].as_str().unwrap();
    assert!(key.starts_with("sk_"));
    assert_eq!(minted["name"], "My site");
    assert_eq!(minted["prefix"], &key[..10]);
    assert!(minted["last_used"].is_null());

    let listed = app.get_as(&author, "/api/keys").await.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["prefix"], &key[..10]);
    assert!(listed[0].get("key").is_none());
    assert!(listed[0].get("key_hash").is_none());
}

#[tokio::test]
async fn a_name_is_required() {
    let app = TestApp::spawn().await;
    let author = app.author().await;

    for body in [json!({}), json!({ "name": "   " })] {
        let response = app.post_as(&author, "/api/keys", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.message(), "Name is required");
    }
}

#[tokio::test]
async fn keys_are_private_to_their_owner() {
    let app = TestApp::spawn().await;
    let jane = app.author().await;
    let john = app.author().await;
    app.api_key(&jane).await;

    assert!(app.get_as(&john, "/api/keys").await.json().as_array().unwrap().is_empty());

    let janes = app.get_as(&jane, "/api/keys").await.json();
    let uri = format!("/api/keys/{}", janes[0]["id"].as_str().unwrap());
    let response = app.delete_as(&john, &uri).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Not found");
}

#[tokio::test]
async fn revoked_keys_stop_working() {
    let app = TestApp::spawn().await;
    let author = app.author().await;
    let key = app.api_key(&author).await;
    assert_eq!(
        app.get_with_key(&key, "/api/v1/articles").await.status,
        StatusCode::OK
    );

    let listed = app.get_as(&author, "/api/keys").await.json();
    let uri = format!("/api/keys/{}", listed[0]["id"].as_str().unwrap());
    let deleted = app.delete_as(&author, &uri).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), "Deleted");

    let response = app.get_with_key(&key, "/api/v1/articles").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid API Key");
}
