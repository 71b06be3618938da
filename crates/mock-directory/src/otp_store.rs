use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use {rand::Rng, tracing::info};

/// How long an issued code stays valid.
const OTP_TTL: Duration = Duration::from_secs(300);

/// In-memory OTP store: `client_id -> (code, issued_at)`.
///
/// Expired entries are purged lazily on access; a successful verification
/// consumes the code so it cannot be replayed.
pub struct OtpStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    ttl: Duration,
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore {
    pub fn new() -> Self {
        Self::with_ttl(OTP_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Generate and store a 6-digit code for `client_id`, replacing any
    /// outstanding one.
    pub fn generate(&self, client_id: &str) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000));
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(client_id.to_string(), (code.clone(), Instant::now()));
        }
        info!(client_id, %code, "otp generated");
        code
    }

    /// `true` when `code` matches the outstanding entry and has not expired.
    pub fn verify(&self, client_id: &str, code: &str) -> bool {
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };
        let Some((stored, issued_at)) = entries.get(client_id) else {
            return false;
        };
        if issued_at.elapsed() > self.ttl {
            entries.remove(client_id);
            info!(client_id, "otp expired");
            return false;
        }
        if stored == code {
            // Consume on success.
            entries.remove(client_id);
            return true;
        }
        false
    }
}
