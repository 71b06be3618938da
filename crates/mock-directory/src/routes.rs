//! Axum routes mirroring the external API wire protocol.
//!
//! - `GET  /clients/lookup?phone=…`  client info by phone
//! - `GET  /clients/{client_id}`    client info by client code
//! - `POST /otp/send`               trigger OTP delivery
//! - `POST /otp/verify`             validate an OTP

use std::sync::Arc;

use {
    axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        routing::{get, post},
    },
    serde::{Deserialize, Serialize},
    tracing::info,
};

use crate::{directory::MockDirectory, otp_store::OtpStore};

/// Shared state behind the mock API routes.
pub struct MockApiState {
    pub directory: MockDirectory,
    pub otps: OtpStore,
}

impl MockApiState {
    pub fn seeded() -> Self {
        Self {
            directory: MockDirectory::seeded(),
            otps: OtpStore::new(),
        }
    }
}

#[derive(Serialize)]
struct ClientInfo {
    client_id: String,
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct LookupQuery {
    phone: String,
}

#[derive(Deserialize)]
struct OtpSendRequest {
    client_id: String,
}

#[derive(Serialize)]
struct OtpSendResponse {
    success: bool,
    message: String,
}

#[derive(Deserialize)]
struct OtpVerifyRequest {
    client_id: String,
    otp: String,
}

#[derive(Serialize)]
struct OtpVerifyResponse {
    valid: bool,
}

/// Build the mock API router; the gateway nests it under `/external/v1`.
pub fn external_api_router(state: Arc<MockApiState>) -> Router {
    Router::new()
        .route("/clients/lookup", get(lookup_by_phone))
        .route("/clients/{client_id}", get(lookup_by_client_code))
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .with_state(state)
}

async fn lookup_by_phone(
    State(state): State<Arc<MockApiState>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ClientInfo>, StatusCode> {
    state
        .directory
        .find_by_phone(&query.phone)
        .map(|r| {
            Json(ClientInfo {
                client_id: r.code.clone(),
                name: r.name.clone(),
                email: r.email.clone(),
            })
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn lookup_by_client_code(
    State(state): State<Arc<MockApiState>>,
    Path(client_id): Path<String>,
) -> Result<Json<ClientInfo>, StatusCode> {
    state
        .directory
        .find_by_code(&client_id)
        .map(|r| {
            Json(ClientInfo {
                client_id: r.code.clone(),
                name: r.name.clone(),
                email: r.email.clone(),
            })
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn send_otp(
    State(state): State<Arc<MockApiState>>,
    Json(body): Json<OtpSendRequest>,
) -> Result<Json<OtpSendResponse>, StatusCode> {
    let Some(record) = state.directory.find_by_code(&body.client_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let code = state.otps.generate(&body.client_id);
    // A real provider would email/SMS the code; the mock logs it instead.
    info!(
        client_id = %body.client_id,
        name = %record.name,
        %code,
        email = %record.email,
        "otp issued (mock delivery)"
    );
    Ok(Json(OtpSendResponse {
        success: true,
        message: format!("OTP sent to {}", record.email),
    }))
}

async fn verify_otp(
    State(state): State<Arc<MockApiState>>,
    Json(body): Json<OtpVerifyRequest>,
) -> Json<OtpVerifyResponse> {
    let valid = state.otps.verify(&body.client_id, &body.otp);
    info!(client_id = %body.client_id, valid, "otp verification");
    Json(OtpVerifyResponse { valid })
}

#[cfg(test)]
mod tests {
    use {
        axum::body::{Body, to_bytes},
        http::{Request, StatusCode},
        tower::ServiceExt,
    };

    use super::*;

    fn app() -> (Router, Arc<MockApiState>) {
        let state = Arc::new(MockApiState::seeded());
        (external_api_router(Arc::clone(&state)), state)
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn phone_lookup_hit() {
        let (app, _state) = app();
        let resp = app
            .oneshot(
                Request::get("/clients/lookup?phone=%2B15551234567")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["client_id"], "ACME-1001");
        assert_eq!(json["name"], "Alice Johnson");
    }

    #[tokio::test]
    async fn phone_lookup_miss_is_404() {
        let (app, _state) = app();
        let resp = app
            .oneshot(
                Request::get("/clients/lookup?phone=%2B10000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn client_code_lookup() {
        let (app, _state) = app();
        let resp = app
            .oneshot(Request::get("/clients/GLX-2001").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["name"], "Carol Davis");
    }

    #[tokio::test]
    async fn otp_send_requires_known_client() {
        let (app, _state) = app();
        let resp = app
            .oneshot(
                Request::post("/otp/send")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"client_id": "NOPE-0000"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn otp_send_then_verify_round_trip() {
        let (app, state) = app();
        let resp = app
            .clone()
            .oneshot(
                Request::post("/otp/send")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"client_id": "ACME-1001"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "OTP sent to alice@example.com");

        // Re-issue through the store handle to learn the code, then verify
        // it over the wire.
        let code = state.otps.generate("ACME-1001");
        let resp = app
            .oneshot(
                Request::post("/otp/verify")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"client_id": "ACME-1001", "otp": "{code}"}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["valid"], true);
    }

    #[tokio::test]
    async fn otp_verify_wrong_code_is_invalid() {
        let (app, state) = app();
        state.otps.generate("ACME-1001");
        let resp = app
            .oneshot(
                Request::post("/otp/verify")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"client_id": "ACME-1001", "otp": "not-it"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["valid"], false);
    }
}
