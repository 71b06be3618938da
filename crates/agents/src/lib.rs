//! Conversational agents.
//!
//! An [`Agent`] consumes one inbound message plus the party's session state
//! and produces the reply to send back. The two concrete agents are
//! alternative renditions of the verification flow:
//!
//! - [`OtpAuthAgent`]: phone lookup, client-code fallback, then a one-time
//!   code gates the final transition to authenticated.
//! - [`DirectAuthAgent`]: same lookups, but a match authenticates
//!   immediately and a confirmation email is attempted afterwards.
//!
//! The two are never merged; they carry different security postures and are
//! selected by configuration.

pub mod agent;
pub mod direct;
pub mod mask;
pub mod otp;

#[cfg(test)]
pub(crate) mod testutil;

pub use {
    agent::{Agent, Reply},
    direct::DirectAuthAgent,
    mask::mask_email,
    otp::OtpAuthAgent,
};
