//! Integration tests for the webhook endpoints, run against the in-process
//! router with the mock directory nested.

use std::sync::Arc;

use {
    axum::{
        Router,
        body::{Body, to_bytes},
    },
    hmac::{Hmac, Mac},
    http::{Request, StatusCode},
    sha2::Sha256,
    tower::ServiceExt,
};

use {
    vouch_config::{VerifyFlow, VouchConfig},
    vouch_gateway::{AppState, build_app, build_context},
};

fn test_config() -> VouchConfig {
    let mut cfg = VouchConfig::default();
    cfg.whatsapp.verify_token = "test_token".into();
    cfg
}

fn app_with(cfg: &VouchConfig) -> (Router, Arc<AppState>) {
    let context = build_context(cfg).unwrap();
    let state = Arc::clone(&context.state);
    (build_app(context.state, context.mock), state)
}

fn message_payload(from: &str, text: &str) -> String {
    format!(
        r#"{{"entry": [{{"changes": [{{"field": "messages", "value": {{
            "messages": [{{"from": "{from}", "type": "text", "text": {{"body": "{text}"}}}}]
        }}}}]}}]}}"#
    )
}

fn sign(body: &[u8], secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[tokio::test]
async fn subscribe_challenge_is_echoed() {
    let (app, _state) = app_with(&test_config());
    let resp = app
        .oneshot(
            Request::get(
                "/webhook?hub.mode=subscribe&hub.verify_token=test_token&hub.challenge=challenge_123",
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"challenge_123");
}

#[tokio::test]
async fn subscribe_with_wrong_token_is_forbidden() {
    let (app, _state) = app_with(&test_config());
    let resp = app
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unsigned_delivery_is_rejected_when_secret_is_set() {
    let mut cfg = test_config();
    cfg.whatsapp.app_secret = "shh".into();
    let (app, _state) = app_with(&cfg);

    let resp = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"entry": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_delivery_is_accepted() {
    let mut cfg = test_config();
    cfg.whatsapp.app_secret = "shh".into();
    let (app, _state) = app_with(&cfg);

    let body = r#"{"entry": []}"#;
    let resp = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .header("x-hub-signature-256", sign(body.as_bytes(), "shh"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_message_events_are_acknowledged() {
    let (app, _state) = app_with(&test_config());
    let resp = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"entry": [{"changes": [{"field": "statuses", "value": {}}]}]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn logout_keyword_clears_the_session() {
    let (app, state) = app_with(&test_config());
    state.sessions.get("+15551234567");
    assert_eq!(state.sessions.active_count(), 1);

    let resp = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(message_payload("+15551234567", "logout")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.sessions.active_count(), 0);
}

#[tokio::test]
async fn direct_flow_authenticates_a_known_phone_through_the_mock() {
    let mut cfg = test_config();
    cfg.verify.flow = VerifyFlow::Direct;
    let (app, state) = app_with(&cfg);

    // Alice's phone is in the seeded roster; first contact seeds the lookup
    // with the sender id, so any text authenticates her directly. The
    // confirmation email fails (no SMTP server here) without reverting it.
    let resp = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(message_payload("+15551234567", "hi")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let session = state.sessions.get("+15551234567");
    let session = session.lock().await;
    assert!(session.is_authenticated());
    assert_eq!(session.state.display_name(), Some("Alice Johnson"));
}

#[tokio::test]
async fn health_probe_reports_the_app() {
    let (app, _state) = app_with(&test_config());
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["app"], "vouch");
}
