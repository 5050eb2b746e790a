use crate::helpers::{id_of, spawn_app};
use mailmaster_common::types::CampaignStatus;
use serde_json::{json, Value};

#[tokio::test]
async fn campaigns_start_as_drafts() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;

    let campaign = app.create_campaign(&id_of(&newsletter), None).await;
    assert_eq!(campaign["status"], "draft");
    assert_eq!(campaign["newsletter_id"], newsletter["id"]);
    assert!(campaign["sent_at"].is_null());
}

#[tokio::test]
async fn campaign_requires_known_newsletter_and_status() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("Weekly", "<h1>Hi</h1>").await;

    let response = app
        .post("/api/campaigns", &app.editor_token)
        .json(&json!({
            "newsletter_id": "0190a7c4-0000-7000-8000-000000000000",
            "title": "Launch",
            "subject": "Hello",
        }))
        .await;
    assert_eq!(response.status_code(), 422);
    assert_eq!(
        response.json::<Value>()["errors"]["newsletter_id"][0],
        "The selected newsletter id is invalid."
    );

    let response = app
        .post("/api/campaigns", &app.editor_token)
        .json(&json!({
            "newsletter_id": newsletter["id"],
            "title": "Launch",
            "subject": "Hello",
            "status": "archived",
        }))
        .await;
    assert_eq!(response.status_code(), 422);
    assert_eq!(
        response.json::<Value>()["errors"]["status"][0],
        "The selected status is invalid."
    );
}

#[tokio::test]
async fn numeric_newsletter_id_is_an_invalid_selection() {
    let app = spawn_app().await;

    let response = app
        .post("/api/campaigns", &app.editor_token)
        .json(&json!({ "newsletter_id": 5, "title": "Launch", "subject": "Hello" }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(
        body["errors"]["newsletter_id"][0],
        "The selected newsletter id is invalid."
    );
    assert!(body["errors"]["body"].is_null());
}

#[tokio::test]
async fn sending_a_draft_mails_every_subscriber() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;
    app.create_subscriber("one@example.com").await;
    app.create_subscriber("two@example.com").await;
    let path = format!("/api/campaigns/{}", id_of(&campaign));

    let response = app.post(&format!("{}/send", path), &app.editor_token).await;
    assert_eq!(response.status_code(), 200);
    let message = response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.ends_with("to 2 subscribers."));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|mail| mail.subject == "Big news"));
    assert!(sent.iter().all(|mail| mail.html_body == "<h1>Hi</h1>"));

    let body: Value = app.get(&path, &app.editor_token).await.json();
    assert_eq!(body["status"], "pending");
    assert!(body["sent_at"].is_string());

    let id = uuid::Uuid::parse_str(&id_of(&campaign)).unwrap();
    let stored = app.store.campaigns.get(id).await.unwrap().unwrap();
    assert!(stored.sent_at.is_some());
    assert_eq!(stored.status_enum(), Some(CampaignStatus::Pending));
}

#[tokio::test]
async fn failed_deliveries_do_not_stop_the_send() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;
    app.create_subscriber("bounce@example.com").await;
    app.create_subscriber("ok@example.com").await;
    app.mailer.reject("bounce@example.com");
    let path = format!("/api/campaigns/{}", id_of(&campaign));

    let response = app.post(&format!("{}/send", path), &app.editor_token).await;
    assert_eq!(response.status_code(), 200);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ok@example.com");

    let body: Value = app.get(&path, &app.editor_token).await.json();
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn only_drafts_can_be_sent() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), Some("sent")).await;
    app.create_subscriber("one@example.com").await;
    let path = format!("/api/campaigns/{}", id_of(&campaign));

    let response = app.post(&format!("{}/send", path), &app.editor_token).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["message"],
        "Campaign must be in draft status to be sent."
    );
    assert!(app.mailer.sent().is_empty());

    let body: Value = app.get(&path, &app.editor_token).await.json();
    assert_eq!(body["status"], "sent");
}

#[tokio::test]
async fn sending_an_unknown_campaign_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/campaigns/0190a7c4-0000-7000-8000-000000000000/send",
            &app.editor_token,
        )
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn preview_returns_newsletter_content() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;

    let response = app
        .get(
            &format!("/api/campaigns/{}/preview", id_of(&campaign)),
            &app.editor_token,
        )
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "content": "<h1>Hi</h1>" }));
}

#[tokio::test]
async fn update_campaign_status() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;

    let response = app
        .put(
            &format!("/api/campaigns/{}", id_of(&campaign)),
            &app.editor_token,
        )
        .json(&json!({ "status": "sent", "title": "Renamed" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "sent");
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["subject"], "Big news");
}

#[tokio::test]
async fn only_admins_delete_campaigns() {
    let app = spawn_app().await;
    let newsletter = app.create_newsletter("T", "<h1>Hi</h1>").await;
    let campaign = app.create_campaign(&id_of(&newsletter), None).await;
    let path = format!("/api/campaigns/{}", id_of(&campaign));

    assert_eq!(app.delete(&path, &app.editor_token).await.status_code(), 403);
    assert_eq!(app.delete(&path, &app.admin_token).await.status_code(), 204);
    assert_eq!(app.get(&path, &app.admin_token).await.status_code(), 404);
    assert_eq!(
        app.get(&format!("/api/newsletters/{}", id_of(&newsletter)), &app.admin_token)
            .await
            .status_code(),
        200
    );
}
