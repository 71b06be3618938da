//! OTP-gated verification flow.
//!
//! 1. On first contact the sender's phone number is checked against the
//!    client directory.
//! 2. On a match, a one-time code is sent to the registered email.
//! 3. With no phone match, the party is asked for their client code instead.
//! 4. A matching client code likewise triggers code delivery.
//! 5. The party types the code to complete verification.
//! 6. With neither a phone nor a code match, the party is directed to
//!    support.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tracing::{info, warn},
};

use {
    vouch_identity::{IdentityDirectory, IdentityRecord, OtpChannel},
    vouch_sessions::{AuthState, SessionState, VerifiedIdentity},
};

use crate::{
    agent::{Agent, Reply},
    mask::mask_email,
};

/// Fallback reply for unexpected collaborator faults.
const SUPPORT_REPLY: &str =
    "⚠️ Something went wrong on our side. Please try again in a moment or contact support.";

/// Authenticates a party via phone number or client code plus a one-time
/// code. Holds no state of its own; everything lives in the session.
pub struct OtpAuthAgent {
    directory: Arc<dyn IdentityDirectory>,
    otp: Arc<dyn OtpChannel>,
}

impl OtpAuthAgent {
    pub fn new(directory: Arc<dyn IdentityDirectory>, otp: Arc<dyn OtpChannel>) -> Self {
        Self { directory, otp }
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
                self.initiate_otp(record, state).await
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
        self.initiate_otp(record, state).await
    }

    /// Pin the identity, dispatch a code, and advance to `AwaitingOtp`.
    ///
    /// The state is NOT advanced when dispatch fails, so the party is never
    /// stuck awaiting a code that was never sent; the prior state stays
    /// retry-capable.
    async fn initiate_otp(&self, record: IdentityRecord, state: &mut SessionState) -> Reply {
        let client_id = record.client_id.clone();
        let display_name = record.display_name.clone();
        let masked = mask_email(&record.email);
        state.identity = Some(VerifiedIdentity {
            client_id: record.client_id,
            display_name: record.display_name,
            email: record.email,
        });

        let sent = match self.otp.send_otp(&client_id).await {
            Ok(sent) => sent,
            Err(error) => {
                warn!(%client_id, %error, "otp dispatch failed");
                return Reply::text(SUPPORT_REPLY);
            },
        };
        if !sent {
            warn!(%client_id, "otp channel refused dispatch");
            return Reply::text(
                "⚠️ We found your account but were unable to send the verification code. \
                 Please try again later or contact support.",
            );
        }

        state.auth = AuthState::AwaitingOtp;
        info!(%client_id, email = %masked, "otp sent");
        Reply::text(format!(
            "👤 Account found: *{display_name}*\n\n\
             A verification code has been sent to *{masked}*.\n\
             Please enter the *6-digit OTP* to complete verification."
        ))
    }

    async fn handle_otp(&self, code: &str, state: &mut SessionState) -> Reply {
        let (client_id, display_name) = state
            .identity
            .as_ref()
            .map(|i| (i.client_id.clone(), i.display_name.clone()))
            .unwrap_or_default();

        let valid = match self.otp.verify_otp(&client_id, code).await {
            Ok(valid) => valid,
            Err(error) => {
                warn!(%client_id, %error, "otp verification call failed");
                return Reply::text(SUPPORT_REPLY);
            },
        };

        if valid {
            state.auth = AuthState::Authenticated;
            info!(%client_id, display_name = %display_name, "party authenticated via otp");
            return Reply::text(format!(
                "✅ Verified! Welcome, *{display_name}*.\n\n\
                 You have been successfully authenticated."
            ));
        }

        info!(%client_id, "invalid otp");
        Reply::text(
            "❌ That code is incorrect or has expired.\n\n\
             Please try again with the correct *6-digit OTP*.",
        )
    }
}

#[async_trait]
impl Agent for OtpAuthAgent {
    fn name(&self) -> &'static str {
        "otp-auth"
    }

    async fn handle(&self, message: &str, state: &mut SessionState) -> Reply {
        match state.auth {
            AuthState::Authenticated => Reply::text(format!(
                "You are already verified as *{}*. How can I help you today?",
                state.display_name().unwrap_or("there")
            )),
            AuthState::AwaitingOtp => self.handle_otp(message.trim(), state).await,
            AuthState::AwaitingClientCode => self.handle_client_code(message.trim(), state).await,
            AuthState::AwaitingPhone => self.handle_phone(message.trim(), state).await,
        }
    }
}
