//! End-to-end tests against a running Dropcast server.
//!
//! All tests here are ignored by default; see the crate docs for how to
//! bring up the server and database first.

use serde_json::{Value, json};

/// Server base URL, overridable for non-default ports.
fn base_url() -> String {
    std::env::var("DROPCAST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

// =============================================================================
// Health Checks
// =============================================================================

#[tokio::test]
#[ignore = "Requires running dropcast server"]
async fn test_health_endpoint() {
    let response = reqwest::get(format!("{}/health", base_url()))
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running dropcast server and database"]
async fn test_readiness_endpoint() {
    let response = reqwest::get(format!("{}/health/ready", base_url()))
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 200);
}

// =============================================================================
// Webhook Acknowledgment
// =============================================================================

#[tokio::test]
#[ignore = "Requires running dropcast server and database"]
async fn test_webhook_acknowledges_malformed_payload() {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/webhooks/telegram", base_url()))
        .body("this is not json")
        .send()
        .await
        .expect("server reachable");

    // Malformed updates are acknowledged, never bounced back to Telegram.
    assert_eq!(response.status(), 200);
    let ack: Value = response.json().await.expect("json ack");
    assert_eq!(ack["ok"], json!(true));
}

#[tokio::test]
#[ignore = "Requires running dropcast server and database"]
async fn test_webhook_acknowledges_non_command_chatter() {
    let client = reqwest::Client::new();
    let update = json!({
        "update_id": 1,
        "message": {
            "chat": {"id": 987_654, "username": "visitor"},
            "text": "hello bot"
        }
    });

    let response = client
        .post(format!("{}/api/webhooks/telegram", base_url()))
        .json(&update)
        .send()
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 200);
    let ack: Value = response.json().await.expect("json ack");
    assert_eq!(ack["ok"], json!(true));
}

// =============================================================================
// Drop Publication
// =============================================================================

#[tokio::test]
#[ignore = "Requires running dropcast server and database"]
async fn test_publish_unknown_drop_is_not_found() {
    let client = reqwest::Client::new();
    let missing = uuid::Uuid::new_v4();

    let response = client
        .post(format!("{}/api/drops/{missing}/publish", base_url()))
        .send()
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 404);
}
