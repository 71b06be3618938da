//! Per-party conversation sessions.
//!
//! One session per party id (the sender's phone number), created lazily on
//! first contact and kept in memory for the process lifetime. The store hands
//! out a per-party lock so concurrently delivered turns for the same party
//! serialize while distinct parties proceed independently.

pub mod state;
pub mod store;

pub use {
    state::{AuthState, Session, SessionState, VerifiedIdentity},
    store::SessionStore,
};
