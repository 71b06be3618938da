use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VouchConfig {
    pub app_name: AppName,
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    pub directory: DirectoryConfig,
    pub verify: VerifyConfig,
    pub smtp: SmtpConfig,
}

/// Product name used in replies and emails. Newtype so the default is the
/// crate name rather than an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppName(pub String);

impl Default for AppName {
    fn default() -> Self {
        Self("vouch".into())
    }
}

impl std::fmt::Display for AppName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8686,
        }
    }
}

/// WhatsApp Business Cloud API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Token echoed back during the webhook subscribe handshake.
    pub verify_token: String,
    /// Bearer token for outbound sends. Empty means replies are logged only.
    pub api_token: String,
    pub phone_number_id: String,
    /// App secret for `X-Hub-Signature-256` checks. Empty disables them.
    pub app_secret: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            verify_token: "changeme".into(),
            api_token: String::new(),
            phone_number_id: String::new(),
            app_secret: String::new(),
        }
    }
}

/// External client-directory API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub base_url: String,
    /// Serve the co-located mock API under `/external/v1`.
    pub mock: bool,
    /// Bound on every directory/OTP call.
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8686/external/v1".into(),
            mock: true,
            timeout_secs: 10,
        }
    }
}

/// Which rendition of the verification flow the router runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyFlow {
    /// Lookup match sends a one-time code that gates authentication.
    #[default]
    Otp,
    /// Lookup match authenticates immediately; confirmation email after.
    Direct,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub flow: VerifyFlow,
}

/// SMTP settings for confirmation emails (direct flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 587,
            username: None,
            password: None,
            from: "no-reply@vouch.local".into(),
        }
    }
}
