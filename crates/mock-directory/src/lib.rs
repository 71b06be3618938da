//! Co-located mock of the external client-directory + OTP API.
//!
//! Stands in for the customer's real API during development: an in-memory
//! seeded roster behind the same wire protocol the [`vouch_identity`] HTTP
//! client speaks, plus an in-memory OTP store with expiry. The gateway nests
//! the routes under `/external/v1` when mock mode is enabled.
//!
//! [`MockDirectory`] also implements the directory trait directly, which is
//! what the direct-confirmation flow uses as its local directory.

pub mod directory;
pub mod otp_store;
pub mod routes;

pub use {
    directory::{DirectoryRecord, MockDirectory},
    otp_store::OtpStore,
    routes::{MockApiState, external_api_router},
};
