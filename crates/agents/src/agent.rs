use {async_trait::async_trait, vouch_sessions::SessionState};

/// Value returned by an agent after processing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The text the transport renders back to the user.
    pub text: String,
    /// Reserved for future conversation-termination signaling. No current
    /// flow sets this.
    pub end_conversation: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_conversation: false,
        }
    }
}

/// A conversational agent.
///
/// Agents are the only components that read or mutate the session state
/// handed to `handle`; everything else treats it as opaque.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name, used in logs and routing decisions.
    fn name(&self) -> &'static str;

    /// Process one inbound message and produce the reply.
    async fn handle(&self, message: &str, state: &mut SessionState) -> Reply;
}
