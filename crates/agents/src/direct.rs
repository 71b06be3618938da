//! Direct-confirmation verification flow.
//!
//! Same lookups as the OTP flow, but a phone or client-code match
//! authenticates immediately; a confirmation email is attempted afterwards
//! as a best-effort notification. A failed notification is reported inline
//! and never reverts the authenticated state. This is a deliberately weaker
//! posture than the OTP flow and is only selected explicitly via config.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tracing::{info, warn},
};

use {
    vouch_identity::{IdentityDirectory, IdentityRecord, NotificationChannel},
    vouch_sessions::{AuthState, SessionState, VerifiedIdentity},
};

use crate::{
    agent::{Agent, Reply},
    mask::mask_email,
};

/// Fallback reply for unexpected collaborator faults.
const SUPPORT_REPLY: &str =
    "⚠️ Something went wrong on our side. Please try again in a moment or contact support.";

/// Authenticates a party directly on a directory match, then notifies the
/// registered email.
pub struct DirectAuthAgent {
    directory: Arc<dyn IdentityDirectory>,
    notifier: Arc<dyn NotificationChannel>,
}

impl DirectAuthAgent {
    pub fn new(directory: Arc<dyn IdentityDirectory>, notifier: Arc<dyn NotificationChannel>) -> Self {
        Self {
            directory,
            notifier,
        }
    }

    async fn handle_phone(&self, phone: &str, state: &mut SessionState) -> Reply {
        let record = match self.directory.lookup_by_phone(phone).await {
            Ok(record) => record,
            Err(error) => {
                warn!(phone, %error, "phone lookup failed");
                return Reply::text(SUPPORT_REPLY);
            },
        };

        match record {
            Some(record) => {
                info!(phone, client_id = %record.client_id, "phone matched a directory record");
                self.authenticate(record, state).await
            },
            None => {
                state.auth = AuthState::AwaitingClientCode;
                info!(phone, "phone not in directory, requesting client code");
                Reply::text(
                    "🔍 I couldn't find an account linked to this phone number.\n\n\
                     Please provide your *Client ID* so I can look you up.",
                )
            },
        }
    }

    async fn handle_client_code(&self, code: &str, state: &mut SessionState) -> Reply {
        let record = match self.directory.lookup_by_client_code(code).await {
            Ok(record) => record,
            Err(error) => {
                warn!(code, %error, "client code lookup failed");
                return Reply::text(SUPPORT_REPLY);
            },
        };

        let Some(record) = record else {
            info!(code, "client code not in directory");
            return Reply::text(
                "❌ Sorry, I couldn't find an account with that Client ID.\n\n\
                 Please double-check and try again, or contact support for help.",
            );
        };

        info!(code, display_name = %record.display_name, "client code matched");
        self.authenticate(record, state).await
    }

    /// Authenticate on the match, then attempt the confirmation email.
    /// Notification failure is reported inline, not rolled back.
    async fn authenticate(&self, record: IdentityRecord, state: &mut SessionState) -> Reply {
        let display_name = record.display_name.clone();
        let email = record.email.clone();
        state.identity = Some(VerifiedIdentity {
            client_id: record.client_id.clone(),
            display_name: record.display_name,
            email: record.email,
        });
        state.auth = AuthState::Authenticated;
        info!(client_id = %record.client_id, display_name = %display_name, "party authenticated directly");

        let mut text = format!(
            "✅ Verified! Welcome, *{display_name}*.\n\n\
             You have been successfully authenticated."
        );
        match self.notifier.send_confirmation(&email, &display_name).await {
            Ok(()) => {
                let masked = mask_email(&email);
                text.push_str(&format!(
                    "\nA confirmation email is on its way to *{masked}*."
                ));
            },
            Err(error) => {
                warn!(client_id = %record.client_id, %error, "confirmation email failed");
                text.push_str(
                    "\n(We couldn't send the confirmation email, but your verification is complete.)",
                );
            },
        }
        Reply::text(text)
    }
}

#[async_trait]
impl Agent for DirectAuthAgent {
    fn name(&self) -> &'static str {
        "direct-auth"
    }

    async fn handle(&self, message: &str, state: &mut SessionState) -> Reply {
        match state.auth {
            AuthState::Authenticated => Reply::text(format!(
                "You are already verified as *{}*. How can I help you today?",
                state.display_name().unwrap_or("there")
            )),
            // This flow has no OTP hop; a leftover awaiting_otp state (flow
            // switched mid-conversation) falls back to the code prompt.
            AuthState::AwaitingOtp | AuthState::AwaitingClientCode => {
                self.handle_client_code(message.trim(), state).await
            },
            AuthState::AwaitingPhone => self.handle_phone(message.trim(), state).await,
        }
    }
}
