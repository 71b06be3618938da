//! WhatsApp Business Cloud API front end.
//!
//! Receives webhook deliveries from Meta, verifies them (subscribe challenge
//! and `X-Hub-Signature-256`), feeds message texts through the
//! [`vouch_routing::MessageRouter`], and sends replies back over the Cloud
//! API. When mock mode is enabled the external directory API is served
//! in-process under `/external/v1`.

pub mod outbound;
pub mod server;
pub mod services;
pub mod types;
pub mod webhook;

pub use {
    outbound::CloudApiOutbound,
    server::{AppState, build_app, serve},
    services::{GatewayContext, build_context, build_router},
};
