//! Inbound webhook payload types (Meta Cloud API).

use serde::Deserialize;

/// Top-level webhook delivery. Simplified shape:
///
/// ```json
/// { "entry": [{ "changes": [{ "field": "messages", "value": {
///     "metadata": { "phone_number_id": "…" },
///     "contacts": [{ "wa_id": "…", "profile": { "name": "…" } }],
///     "messages": [{ "from": "+15551234567", "type": "text",
///                    "text": { "body": "Hello!" } }] } }] }] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: String,
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub phone_number_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub wa_id: String,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(default, rename = "type")]
    pub message_type: String,
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    pub body: String,
}

impl InboundMessage {
    /// Text content, if this is a text message with a non-empty body.
    pub fn text_body(&self) -> Option<&str> {
        self.text
            .as_ref()
            .map(|t| t.body.as_str())
            .filter(|b| !b.is_empty())
    }
}
