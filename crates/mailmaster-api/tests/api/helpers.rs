use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use mailmaster_common::types::UserRole;
use mailmaster_core::{AccountService, MailError, Mailer, OutgoingMail, Registration};
use mailmaster_storage::Store;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Mailer that keeps every message and can refuse chosen recipients
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    rejected: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reject(&self, address: &str) {
        self.rejected.lock().unwrap().push(address.to_string());
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.rejected.lock().unwrap().contains(&mail.to) {
            return Err(MailError::Transport("550 rejected".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Store,
    pub mailer: Arc<RecordingMailer>,
    pub admin_token: String,
    pub editor_token: String,
}

pub async fn spawn_app() -> TestApp {
    let store = Store::in_memory();
    let mailer = Arc::new(RecordingMailer::default());

    let accounts = AccountService::new(store.clone());
    let admin_token = create_user(&accounts, "admin@example.com", UserRole::Admin).await;
    let editor_token = create_user(&accounts, "editor@example.com", UserRole::Editor).await;

    let state = mailmaster_api::AppState::new(
        store.clone(),
        mailer.clone(),
        Some("http://localhost".to_string()),
    );
    let router = mailmaster_api::create_router(state, &[]);
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        store,
        mailer,
        admin_token,
        editor_token,
    }
}

async fn create_user(accounts: &AccountService, email: &str, role: UserRole) -> String {
    accounts
        .ensure_user(Registration {
            name: format!("{} user", role),
            email: email.to_string(),
            password: "password".to_string(),
            role,
        })
        .await
        .expect("Failed to create user");
    accounts
        .login(email, "password")
        .await
        .expect("Failed to log in")
        .token
}

pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

impl TestApp {
    pub fn get(&self, path: &str, token: &str) -> TestRequest {
        bearer(self.server.get(path), token)
    }

    pub fn post(&self, path: &str, token: &str) -> TestRequest {
        bearer(self.server.post(path), token)
    }

    pub fn put(&self, path: &str, token: &str) -> TestRequest {
        bearer(self.server.put(path), token)
    }

    pub fn delete(&self, path: &str, token: &str) -> TestRequest {
        bearer(self.server.delete(path), token)
    }

    pub async fn create_newsletter(&self, title: &str, content: &str) -> Value {
        let response = self
            .post("/api/newsletters", &self.editor_token)
            .json(&json!({ "title": title, "content": content }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json()
    }

    pub async fn create_subscriber(&self, email: &str) -> Value {
        let response = self
            .post("/api/subscribers", &self.editor_token)
            .json(&json!({ "email": email }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json()
    }

    pub async fn create_campaign(&self, newsletter_id: &str, status: Option<&str>) -> Value {
        let mut body = json!({
            "newsletter_id": newsletter_id,
            "title": "Spring launch",
            "subject": "Big news",
        });
        if let Some(status) = status {
            body["status"] = json!(status);
        }

        let response = self
            .post("/api/campaigns", &self.editor_token)
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 201);
        response.json()
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("record has an id").to_string()
}
