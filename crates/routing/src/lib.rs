//! Message routing: session lookup and agent dispatch.
//!
//! The router is the single entry point for inbound messages. Unauthenticated
//! parties go to the configured auth agent; authenticated parties get the
//! post-auth placeholder until task agents exist.

use std::sync::Arc;

use tracing::info;

use {
    vouch_agents::{Agent, Reply},
    vouch_sessions::{AuthState, SessionStore},
};

/// Routes each inbound message to the agent responsible for it.
///
/// Constructed once by the transport entry point and shared; holds its
/// collaborators explicitly rather than reaching for globals.
pub struct MessageRouter {
    sessions: Arc<SessionStore>,
    auth_agent: Arc<dyn Agent>,
}

impl MessageRouter {
    pub fn new(sessions: Arc<SessionStore>, auth_agent: Arc<dyn Agent>) -> Self {
        Self {
            sessions,
            auth_agent,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Route one message from `party_id` and produce the reply.
    ///
    /// The party's session lock is held for the whole turn, so concurrent
    /// deliveries for the same party are processed in arrival order.
    pub async fn route(&self, party_id: &str, message: &str) -> Reply {
        let session = self.sessions.get(party_id);
        let mut session = session.lock().await;

        if !session.is_authenticated() {
            // First contact: the transport already knows the sender's phone
            // number, so that seeds the lookup instead of the message text.
            let input = if session.state.auth == AuthState::AwaitingPhone {
                party_id
            } else {
                message
            };
            info!(party_id, agent = self.auth_agent.name(), "routing to auth agent");
            return self.auth_agent.handle(input, &mut session.state).await;
        }

        // Authenticated; task routing is future work.
        info!(party_id, "party authenticated; no task agent registered yet");
        Reply::text(format!(
            "👋 Hello, *{}*! You are verified. Task-based features are coming soon.\n\n\
             Type *logout* to end your session.",
            session.state.display_name().unwrap_or("there")
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use {
        super::*,
        vouch_sessions::{SessionState, VerifiedIdentity},
    };

    /// Agent stub that records inputs and advances state per a canned script.
    struct ScriptedAgent {
        inputs: Mutex<Vec<String>>,
        next_auth: Option<AuthState>,
    }

    impl ScriptedAgent {
        fn recording() -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                next_auth: None,
            }
        }

        fn advancing_to(auth: AuthState) -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                next_auth: Some(auth),
            }
        }

        fn inputs(&self) -> Vec<String> {
            self.inputs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Agent for ScriptedAgent {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn handle(&self, message: &str, state: &mut SessionState) -> Reply {
            self.inputs.lock().unwrap().push(message.to_string());
            if let Some(auth) = self.next_auth {
                state.auth = auth;
            }
            Reply::text("ok")
        }
    }

    fn router(agent: Arc<ScriptedAgent>) -> MessageRouter {
        MessageRouter::new(Arc::new(SessionStore::new()), agent)
    }

    #[tokio::test]
    async fn first_contact_feeds_party_id() {
        let agent = Arc::new(ScriptedAgent::advancing_to(AuthState::AwaitingClientCode));
        let router = router(Arc::clone(&agent));

        router.route("+15551234567", "hello there").await;
        // The sender id, not the message text, seeds the phone lookup.
        assert_eq!(agent.inputs(), vec!["+15551234567"]);
    }

    #[tokio::test]
    async fn later_turns_feed_the_message_text() {
        let agent = Arc::new(ScriptedAgent::advancing_to(AuthState::AwaitingClientCode));
        let router = router(Arc::clone(&agent));

        router.route("+15551234567", "hello").await;
        router.route("+15551234567", "ACME-1001").await;
        assert_eq!(agent.inputs(), vec!["+15551234567", "ACME-1001"]);
    }

    #[tokio::test]
    async fn send_failure_retry_still_feeds_party_id() {
        // An agent that never advances the state (e.g. OTP dispatch failed):
        // the next turn seeds the phone lookup again.
        let agent = Arc::new(ScriptedAgent::recording());
        let router = router(Arc::clone(&agent));

        router.route("+15551234567", "first").await;
        router.route("+15551234567", "second").await;
        assert_eq!(agent.inputs(), vec!["+15551234567", "+15551234567"]);
    }

    #[tokio::test]
    async fn authenticated_party_gets_placeholder_without_agent_call() {
        let agent = Arc::new(ScriptedAgent::recording());
        let router = router(Arc::clone(&agent));

        {
            let session = router.sessions().get("+15551234567");
            let mut session = session.lock().await;
            session.state.auth = AuthState::Authenticated;
            session.state.identity = Some(VerifiedIdentity {
                client_id: "ACME-1001".into(),
                display_name: "Alice Johnson".into(),
                email: "alice@example.com".into(),
            });
        }

        let reply = router.route("+15551234567", "what now?").await;
        assert!(reply.text.contains("Alice Johnson"));
        assert!(reply.text.contains("logout"));
        assert!(agent.inputs().is_empty());
    }
}
