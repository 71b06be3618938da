//! Outbound message delivery over the WhatsApp Cloud API.

use {
    anyhow::{Context, Result},
    secrecy::{ExposeSecret, Secret},
    serde_json::json,
    tracing::{info, warn},
};

/// Cloud API base URL.
const GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// Sends text replies back to a party via the Cloud API.
///
/// Without an API token every send is logged instead of dispatched, which is
/// the development posture (simulator/mock-only runs).
#[derive(Clone)]
pub struct CloudApiOutbound {
    http: reqwest::Client,
    api_token: Option<Secret<String>>,
    phone_number_id: String,
    base_url: String,
}

impl std::fmt::Debug for CloudApiOutbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudApiOutbound")
            .field("api_token", &"[REDACTED]")
            .field("phone_number_id", &self.phone_number_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudApiOutbound {
    pub fn new(api_token: Option<Secret<String>>, phone_number_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token,
            phone_number_id: phone_number_id.into(),
            base_url: GRAPH_API_BASE.into(),
        }
    }

    /// Point at a different API host (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a text reply to `to`.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let Some(token) = &self.api_token else {
            warn!(to, text, "whatsapp api token not set, reply logged only");
            return Ok(());
        };

        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": text },
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&payload)
            .send()
            .await
            .context("cloud api request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("cloud api rejected send to {to}: {status} {body}");
        }
        info!(to, "reply sent");
        Ok(())
    }
}
