use std::sync::Arc;

use {dashmap::DashMap, tokio::sync::Mutex, tracing::info};

use crate::state::Session;

/// In-memory session store keyed by party id.
///
/// Sessions are wrapped in a `tokio::sync::Mutex`; holding the lock for the
/// duration of a turn is what serializes near-simultaneous deliveries for the
/// same party. Distinct parties land on different map shards and never
/// contend. There is no expiry; `clear` (logout) is the only removal path.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve or create the session for the given party id.
    ///
    /// The returned handle doubles as the per-party turn lock: callers lock
    /// it before handing the state to an agent and release it once the reply
    /// has been produced.
    pub fn get(&self, party_id: &str) -> Arc<Mutex<Session>> {
        if let Some(existing) = self.sessions.get(party_id) {
            return Arc::clone(&existing);
        }
        let entry = self
            .sessions
            .entry(party_id.to_string())
            .or_insert_with(|| {
                info!(party_id, "creating new session");
                Arc::new(Mutex::new(Session::new(party_id)))
            });
        Arc::clone(&entry)
    }

    /// Remove a session (logout). Idempotent; unknown parties are a no-op.
    pub fn clear(&self, party_id: &str) {
        if self.sessions.remove(party_id).is_some() {
            info!(party_id, "session cleared");
        }
    }

    /// Number of live sessions, for observability.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
