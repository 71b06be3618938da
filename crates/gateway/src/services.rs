//! Dependency wiring: config in, constructed collaborators out.
//!
//! Everything the gateway and the simulator need is built here explicitly
//! and passed down; nothing reaches for globals.

use std::{sync::Arc, time::Duration};

use {
    anyhow::{Context, Result},
    secrecy::Secret,
    tracing::info,
};

use {
    vouch_agents::{Agent, DirectAuthAgent, OtpAuthAgent},
    vouch_config::{VerifyFlow, VouchConfig},
    vouch_identity::{DirectoryClient, IdentityDirectory, SmtpNotifier, SmtpOptions},
    vouch_mock_directory::MockApiState,
    vouch_routing::MessageRouter,
    vouch_sessions::SessionStore,
};

use crate::{outbound::CloudApiOutbound, server::AppState};

/// Fully wired gateway: shared app state plus the optional in-process mock
/// directory API.
pub struct GatewayContext {
    pub state: Arc<AppState>,
    pub mock: Option<Arc<MockApiState>>,
}

/// Build the session store, auth agent, and router from config.
///
/// Returns the mock API state as well when mock mode is on, so the caller
/// can nest its routes.
pub fn build_router(
    config: &VouchConfig,
) -> Result<(Arc<SessionStore>, Arc<MessageRouter>, Option<Arc<MockApiState>>)> {
    let sessions = Arc::new(SessionStore::new());
    let mock = config
        .directory
        .mock
        .then(|| Arc::new(MockApiState::seeded()));

    let agent = build_auth_agent(config, mock.as_ref())?;
    info!(flow = ?config.verify.flow, mock = config.directory.mock, "auth flow configured");

    let router = Arc::new(MessageRouter::new(Arc::clone(&sessions), agent));
    Ok((sessions, router, mock))
}

fn build_auth_agent(
    config: &VouchConfig,
    mock: Option<&Arc<MockApiState>>,
) -> Result<Arc<dyn Agent>> {
    let timeout = Duration::from_secs(config.directory.timeout_secs);
    match config.verify.flow {
        VerifyFlow::Otp => {
            // The OTP flow always talks to the directory over the wire, even
            // when that wire loops back to the in-process mock.
            let client = Arc::new(
                DirectoryClient::new(&config.directory.base_url, timeout)
                    .context("build directory client")?,
            );
            Ok(Arc::new(OtpAuthAgent::new(
                Arc::clone(&client) as Arc<dyn IdentityDirectory>,
                client,
            )))
        },
        VerifyFlow::Direct => {
            let directory: Arc<dyn IdentityDirectory> = match mock {
                Some(mock) => Arc::new(mock.directory.clone()),
                None => Arc::new(
                    DirectoryClient::new(&config.directory.base_url, timeout)
                        .context("build directory client")?,
                ),
            };
            let notifier = Arc::new(
                SmtpNotifier::new(SmtpOptions {
                    host: config.smtp.host.clone(),
                    port: config.smtp.port,
                    username: config.smtp.username.clone(),
                    password: config.smtp.password.clone().map(Secret::new),
                    from: config.smtp.from.clone(),
                    app_name: config.app_name.to_string(),
                })
                .context("build smtp notifier")?,
            );
            Ok(Arc::new(DirectAuthAgent::new(directory, notifier)))
        },
    }
}

/// Build the complete gateway context from config.
pub fn build_context(config: &VouchConfig) -> Result<GatewayContext> {
    let (sessions, router, mock) = build_router(config)?;

    let api_token = (!config.whatsapp.api_token.is_empty())
        .then(|| Secret::new(config.whatsapp.api_token.clone()));
    let outbound = Arc::new(CloudApiOutbound::new(
        api_token,
        config.whatsapp.phone_number_id.clone(),
    ));

    let state = Arc::new(AppState {
        app_name: config.app_name.to_string(),
        sessions,
        router,
        outbound,
        verify_token: config.whatsapp.verify_token.clone(),
        app_secret: config.whatsapp.app_secret.clone(),
        phone_number_id: config.whatsapp.phone_number_id.clone(),
    });
    Ok(GatewayContext { state, mock })
}
