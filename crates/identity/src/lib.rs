//! Identity resolution and code-delivery capabilities.
//!
//! The auth flow only ever talks to the outside world through the three
//! narrow traits defined here: [`IdentityDirectory`] resolves a phone number
//! or client code to an [`IdentityRecord`], [`OtpChannel`] issues and
//! validates one-time codes, and [`NotificationChannel`] delivers the
//! post-verification confirmation used by the direct flow. Production
//! implementations: [`DirectoryClient`] (HTTP) and [`SmtpNotifier`] (SMTP).

pub mod client;
pub mod error;
pub mod mailer;
pub mod record;

pub use {
    client::DirectoryClient,
    error::{Error, Result},
    mailer::{SmtpNotifier, SmtpOptions},
    record::{IdentityDirectory, IdentityRecord, NotificationChannel, OtpChannel},
};
