//! Axum server: webhook routes, health probe, optional mock API.

use std::sync::Arc;

use {
    axum::{
        Json, Router,
        body::Bytes,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::get,
    },
    serde::Deserialize,
    serde_json::json,
    tracing::{info, warn},
};

use {
    vouch_config::VouchConfig,
    vouch_mock_directory::{MockApiState, external_api_router},
    vouch_routing::MessageRouter,
    vouch_sessions::SessionStore,
};

use crate::{
    outbound::CloudApiOutbound,
    services::build_context,
    types::WebhookPayload,
    webhook::{process_payload, verify_signature, verify_subscription},
};

// ── Shared app state ────────────────────────────────────────────────────────

pub struct AppState {
    pub app_name: String,
    pub sessions: Arc<SessionStore>,
    pub router: Arc<MessageRouter>,
    pub outbound: Arc<CloudApiOutbound>,
    pub verify_token: String,
    /// Empty string disables signature checks.
    pub app_secret: String,
    /// Empty string disables the delivery phone-number check.
    pub phone_number_id: String,
}

// ── Router / startup ────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: Arc<AppState>, mock: Option<Arc<MockApiState>>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/webhook",
            get(webhook_subscribe_handler).post(webhook_receive_handler),
        )
        .with_state(state);

    if let Some(mock) = mock {
        app = app.nest("/external/v1", external_api_router(mock));
    }
    app
}

/// Wire everything from config and serve until shutdown.
pub async fn serve(config: VouchConfig) -> anyhow::Result<()> {
    let context = build_context(&config)?;
    let app = build_app(context.state, context.mock);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "vouch gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "app": state.app_name,
        "active_sessions": state.sessions.active_count(),
    }))
}

#[derive(Deserialize)]
struct SubscribeQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

async fn webhook_subscribe_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscribeQuery>,
) -> Response {
    match verify_subscription(
        query.mode.as_deref(),
        query.verify_token.as_deref(),
        query.challenge.as_deref(),
        &state.verify_token,
    ) {
        Some(challenge) => {
            info!("webhook verified");
            challenge.into_response()
        },
        None => {
            warn!("webhook verification failed (bad token or mode)");
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        },
    }
}

async fn webhook_receive_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.app_secret.is_empty() {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(&body, signature, &state.app_secret) {
            warn!("webhook signature rejected");
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(error) => {
            warn!(%error, "undecodable webhook body, ignoring");
            return Json(json!({ "status": "ok" })).into_response();
        },
    };

    process_payload(&state, payload).await;
    Json(json!({ "status": "ok" })).into_response()
}
