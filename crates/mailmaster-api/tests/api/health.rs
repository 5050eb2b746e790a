use crate::helpers::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn health_endpoints_need_no_token() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "healthy");

    assert_eq!(app.server.get("/health/live").await.status_code(), 200);
    assert_eq!(app.server.get("/health/ready").await.status_code(), 200);
}
