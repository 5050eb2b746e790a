use crate::helpers::{id_of, spawn_app};
use serde_json::{json, Value};

#[tokio::test]
async fn create_and_fetch_newsletter() {
    let app = spawn_app().await;

    let created = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;
    assert_eq!(created["title"], "Weekly");

    let response = app
        .get(&format!("/api/newsletters/{}", id_of(&created)), &app.editor_token)
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["content"], "<h1>Hi</h1>");
}

#[tokio::test]
async fn create_newsletter_validates_fields() {
    let app = spawn_app().await;

    let response = app
        .post("/api/newsletters", &app.editor_token)
        .json(&json!({ "title": "x".repeat(256) }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert!(body["errors"]["title"].is_array());
    assert_eq!(body["errors"]["content"][0], "The content field is required.");
}

#[tokio::test]
async fn update_newsletter_changes_only_sent_fields() {
    let app = spawn_app().await;
    let created = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;

    let response = app
        .put(&format!("/api/newsletters/{}", id_of(&created)), &app.editor_token)
        .json(&json!({ "title": "Monthly" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["title"], "Monthly");
    assert_eq!(body["content"], "<h1>Hi</h1>");
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let app = spawn_app().await;

    let response = app
        .get(
            "/api/newsletters/0190a7c4-0000-7000-8000-000000000000",
            &app.editor_token,
        )
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app.get("/api/newsletters/42", &app.editor_token).await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .put("/api/newsletters/42", &app.editor_token)
        .json(&json!({ "title": "Monthly" }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn only_admins_delete_newsletters() {
    let app = spawn_app().await;
    let created = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;
    let path = format!("/api/newsletters/{}", id_of(&created));

    let response = app.delete(&path, &app.editor_token).await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(
        response.json::<Value>()["message"],
        "This action is unauthorized."
    );
    assert_eq!(app.get(&path, &app.editor_token).await.status_code(), 200);

    let response = app.delete(&path, &app.admin_token).await;
    assert_eq!(response.status_code(), 204);
    assert!(response.text().is_empty());
    assert_eq!(app.get(&path, &app.editor_token).await.status_code(), 404);
}

#[tokio::test]
async fn deleting_a_newsletter_removes_its_campaigns() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;

    let response = app
        .delete(
            &format!("/api/newsletters/{}", id_of(&newsletter)),
            &app.admin_token,
        )
        .await;
    assert_eq!(response.status_code(), 204);

    let response = app
        .get(&format!("/api/campaigns/{}", id_of(&campaign)), &app.editor_token)
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn newsletter_listing_is_paginated() {
    let app = spawn_app().await;
    for i in 0..12 {
        app.create_newsletter(&format!("Issue {}", i), "<p>body</p>")
            .await;
    }

    let response = app.get("/api/newsletters", &app.editor_token).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"]["total"], 12);
    assert_eq!(body["meta"]["per_page"], 10);
    assert_eq!(body["meta"]["last_page"], 2);
    assert_eq!(body["meta"]["path"], "http://localhost/api/newsletters");
    assert_eq!(
        body["links"]["next"],
        "http://localhost/api/newsletters?page=2"
    );
    assert!(body["links"]["prev"].is_null());

    let response = app
        .get("/api/newsletters", &app.editor_token)
        .add_query_param("page", "2")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["from"], 11);
    assert_eq!(body["meta"]["to"], 12);
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() {
    let app = spawn_app().await;
    app.create_newsletter("Weekly", "<h1>Hi</h1>").await;

    let response = app
        .get("/api/newsletters", &app.editor_token)
        .add_query_param("page", "9223372036854775807")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 1);
    assert!(body["meta"]["from"].is_null());
}
