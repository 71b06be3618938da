use std::error::Error as StdError;

/// Crate-wide result type for capability calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for identity/OTP/notification collaborators.
///
/// "Not found" and "delivery refused" are NOT errors; they come back as
/// `Ok(None)` / `Ok(false)` on the respective calls. An `Error` always means
/// an unexpected collaborator fault the agent must absorb.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The collaborator answered with a status outside its contract.
    #[error("{context}: unexpected status {status}")]
    Status { context: String, status: u16 },

    /// The collaborator could not be reached (connect, timeout, decode).
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Message construction or delivery failed.
    #[error("notification failed: {context}: {source}")]
    Delivery {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn status(context: impl Into<String>, status: u16) -> Self {
        Self::Status {
            context: context.into(),
            status,
        }
    }

    #[must_use]
    pub fn transport(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn delivery(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Delivery {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
