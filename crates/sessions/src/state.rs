use serde::{Deserialize, Serialize};

/// Progress of a party through the verification flow.
///
/// `AwaitingPhone` is the implicit initial state: a fresh session has not
/// consumed any input yet, and the router feeds the transport-supplied sender
/// id as the lookup key while the session is still here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    AwaitingPhone,
    AwaitingClientCode,
    AwaitingOtp,
    Authenticated,
}

/// Identity resolved from the client directory, pinned to the session once a
/// phone or client-code lookup matches.
///
/// Wire names match the conversation-state keys used by the external API
/// tooling (`auth_client_id`, `auth_user_name`, `auth_user_email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    #[serde(rename = "auth_client_id")]
    pub client_id: String,
    #[serde(rename = "auth_user_name")]
    pub display_name: String,
    #[serde(rename = "auth_user_email")]
    pub email: String,
}

/// Mutable per-turn conversation state.
///
/// Opaque to everything except the agent currently driving the conversation;
/// only agents transition `auth`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "auth_status")]
    pub auth: AuthState,
    #[serde(flatten)]
    pub identity: Option<VerifiedIdentity>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthState::Authenticated
    }

    /// Display name of the verified identity, if one is pinned.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.display_name.as_str())
    }
}

/// The conversation state for one party.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub party_id: String,
    pub state: SessionState,
}

impl Session {
    pub fn new(party_id: impl Into<String>) -> Self {
        Self {
            party_id: party_id.into(),
            state: SessionState::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }
}
