//! Webhook verification and inbound message processing.

use {
    hmac::{Hmac, Mac},
    sha2::Sha256,
    tracing::{debug, info, warn},
};

use crate::{server::AppState, types::WebhookPayload};

type HmacSha256 = Hmac<Sha256>;

/// Reply sent when the party logs out.
const LOGOUT_REPLY: &str = "👋 You have been logged out. Send any message to start again.";

/// Verify the `X-Hub-Signature-256` header (`sha256=<hex>`) against the raw
/// request body. Comparison is constant-time.
pub fn verify_signature(body: &[u8], signature_header: &str, app_secret: &str) -> bool {
    let Some(expected) = signature_header.strip_prefix("sha256=") else {
        warn!("signature header missing sha256= prefix");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        warn!("failed to initialise webhook HMAC");
        return false;
    };
    mac.update(body);
    let computed = hex::encode(mac.finalize().into_bytes());

    constant_time_eq(&computed, expected)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Answer the Meta webhook subscribe handshake.
///
/// Meta sends `hub.mode=subscribe`, `hub.verify_token=<token>`, and
/// `hub.challenge=<random>`; the challenge is echoed back on a token match.
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    verify_token: &str,
) -> Option<String> {
    if mode? == "subscribe" && token? == verify_token {
        Some(challenge?.to_string())
    } else {
        None
    }
}

/// Walk a webhook delivery and run every text message through the router.
///
/// Non-message changes and non-text messages are ignored. The `logout`
/// keyword is handled here at the transport layer, before any agent runs.
pub async fn process_payload(state: &AppState, payload: WebhookPayload) {
    for entry in payload.entry {
        for change in entry.changes {
            if change.field != "messages" {
                debug!(field = %change.field, "ignoring non-message webhook change");
                continue;
            }
            let value = change.value;

            // Deliveries for another number are not ours to answer.
            if let Some(ref metadata) = value.metadata
                && !state.phone_number_id.is_empty()
                && metadata.phone_number_id != state.phone_number_id
            {
                warn!(
                    expected = %state.phone_number_id,
                    received = %metadata.phone_number_id,
                    "phone number id mismatch"
                );
                continue;
            }

            // Profile names delivered alongside the messages, by wa_id.
            let contacts: std::collections::HashMap<&str, &str> = value
                .contacts
                .iter()
                .filter_map(|c| c.profile.as_ref().map(|p| (c.wa_id.as_str(), p.name.as_str())))
                .collect();

            for msg in value.messages {
                let Some(text) = msg.text_body() else {
                    debug!(msg_type = %msg.message_type, "ignoring non-text message");
                    continue;
                };
                let party_id = msg.from.as_str();
                if party_id.is_empty() {
                    continue;
                }
                let sender_name = contacts
                    .get(party_id)
                    .or_else(|| contacts.get(party_id.trim_start_matches('+')));
                let preview: String = text.chars().take(80).collect();
                info!(party_id, ?sender_name, %preview, "inbound message");

                let reply_text = if text.trim().eq_ignore_ascii_case("logout") {
                    state.sessions.clear(party_id);
                    LOGOUT_REPLY.to_string()
                } else {
                    state.router.route(party_id, text).await.text
                };

                if let Err(error) = state.outbound.send_text(party_id, &reply_text).await {
                    warn!(party_id, %error, "failed to send reply");
                }
            }
        }
    }
}
