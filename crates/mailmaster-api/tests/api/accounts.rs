use crate::helpers::{bearer, spawn_app};
use serde_json::{json, Value};

fn registration(email: &str) -> Value {
    json!({
        "name": "Jane Doe",
        "email": email,
        "password": "secret123",
        "password_confirmation": "secret123",
    })
}

#[tokio::test]
async fn register_returns_a_working_token() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/register")
        .json(&registration("jane@example.com"))
        .await;
    assert_eq!(response.status_code(), 201);
    let token = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let me = app.get("/api/user", &token).await;
    assert_eq!(me.status_code(), 200);
    let user: Value = me.json();
    assert_eq!(user["email"], "jane@example.com");
    assert_eq!(user["role"], "editor");
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn register_with_taken_email_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/register")
        .json(&registration("editor@example.com"))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn register_validates_password() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/register")
        .json(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "password": "abc",
            "password_confirmation": "abd",
        }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["password"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn login_with_wrong_password_issues_no_token() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "editor@example.com", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn login_requires_fields() {
    let app = spawn_app().await;

    let response = app.server.post("/api/login").await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn login_keeps_existing_tokens() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "editor@example.com", "password": "password" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let token = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(app.get("/api/user", &token).await.status_code(), 200);
    assert_eq!(app.get("/api/user", &app.editor_token).await.status_code(), 200);
}

#[tokio::test]
async fn logout_revokes_every_token() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "editor@example.com", "password": "password" }))
        .await;
    let second = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.post("/api/logout", &app.editor_token).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>()["message"],
        "Logged out successfully"
    );

    assert_eq!(app.get("/api/user", &app.editor_token).await.status_code(), 401);
    assert_eq!(app.get("/api/user", &second).await.status_code(), 401);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = spawn_app().await;

    let response = app.server.get("/api/newsletters").await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["message"], "Unauthenticated.");

    let response = bearer(app.server.get("/api/subscribers"), "not-a-token").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn register_reports_taken_email_with_password_errors() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/register")
        .json(&json!({
            "name": "x",
            "email": "editor@example.com",
            "password": "123",
            "password_confirmation": "123",
        }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
    assert_eq!(
        body["errors"]["password"][0],
        "The password field must be at least 6 characters."
    );
}
