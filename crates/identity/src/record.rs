use {async_trait::async_trait, serde::Deserialize};

use crate::error::Result;

/// Client identity resolved by a directory lookup.
///
/// Owned transiently per lookup call; the session pins its own copy of the
/// fields it needs. `name` is the wire name used by the external API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityRecord {
    pub client_id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: String,
}

/// Resolves a phone number or client-issued code to an identity record.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Look up a client by phone number (E.164, e.g. `+15551234567`).
    ///
    /// `Ok(None)` means no active record matches.
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>>;

    /// Look up a client by their client-issued code (e.g. `ACME-1001`).
    async fn lookup_by_client_code(&self, code: &str) -> Result<Option<IdentityRecord>>;
}

/// Issues and validates one-time codes scoped to a client identity.
#[async_trait]
pub trait OtpChannel: Send + Sync {
    /// Request OTP delivery to the client's registered contact.
    ///
    /// `Ok(true)` means the code was dispatched; `Ok(false)` means the
    /// channel refused delivery (unknown client, provider rejection).
    async fn send_otp(&self, client_id: &str) -> Result<bool>;

    /// Validate a code. `Ok(false)` covers both wrong and expired codes.
    async fn verify_otp(&self, client_id: &str, code: &str) -> Result<bool>;
}

/// Delivers the post-verification confirmation (direct flow only).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_confirmation(&self, to_email: &str, user_name: &str) -> Result<()>;
}
