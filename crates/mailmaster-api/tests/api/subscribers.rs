use crate::helpers::{id_of, spawn_app};
use serde_json::{json, Value};

#[tokio::test]
async fn create_subscriber_without_body_fails_on_email() {
    let app = spawn_app().await;

    let response = app.post("/api/subscribers", &app.editor_token).await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
}

#[tokio::test]
async fn subscriber_email_must_be_valid_and_unique() {
    let app = spawn_app().await;
    app.create_subscriber("reader@example.com").await;

    let response = app
        .post("/api/subscribers", &app.editor_token)
        .json(&json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(response.status_code(), 422);

    let response = app
        .post("/api/subscribers", &app.editor_token)
        .json(&json!({ "email": "reader@example.com" }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn taken_email_is_reported_alongside_other_errors() {
    let app = spawn_app().await;
    app.create_subscriber("reader@example.com").await;

    let response = app
        .post("/api/subscribers", &app.editor_token)
        .json(&json!({ "email": "reader@example.com", "name": "x".repeat(256) }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
    assert!(body["errors"]["name"].is_array());
}

#[tokio::test]
async fn update_subscriber_may_keep_its_own_email() {
    let app = spawn_app().await;
    let created = app.create_subscriber("reader@example.com").await;
    let other = app.create_subscriber("other@example.com").await;
    let path = format!("/api/subscribers/{}", id_of(&created));

    let response = app
        .put(&path, &app.editor_token)
        .json(&json!({ "email": "reader@example.com", "name": "Reader" }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["name"], "Reader");

    let response = app
        .put(&path, &app.editor_token)
        .json(&json!({ "email": other["email"] }))
        .await;
    assert_eq!(response.status_code(), 422);

    let response = app
        .put(&path, &app.editor_token)
        .json(&json!({ "name": null }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["name"].is_null());
    assert_eq!(body["email"], "reader@example.com");
}

#[tokio::test]
async fn any_user_may_delete_a_subscriber() {
    let app = spawn_app().await;
    let created = app.create_subscriber("reader@example.com").await;
    let path = format!("/api/subscribers/{}", id_of(&created));

    let response = app.delete(&path, &app.editor_token).await;
    assert_eq!(response.status_code(), 204);
    assert_eq!(app.get(&path, &app.editor_token).await.status_code(), 404);
    assert_eq!(app.delete(&path, &app.editor_token).await.status_code(), 404);
}

#[tokio::test]
async fn subscriber_listing_has_envelope() {
    let app = spawn_app().await;
    app.create_subscriber("reader@example.com").await;

    let response = app
        .get("/api/subscribers", &app.editor_token)
        .add_query_param("page", "abc")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["current_page"], 1);
    assert!(body["links"].is_object());
}
