//! Configuration loading.
//!
//! Config file: `vouch.toml`, searched in the working directory unless an
//! explicit path is given. Values support `${ENV_VAR}` substitution, and a
//! small set of `VOUCH_*` environment variables override the file.

pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config, substitute_env},
    schema::{
        DirectoryConfig, ServerConfig, SmtpConfig, VerifyConfig, VerifyFlow, VouchConfig,
        WhatsAppConfig,
    },
};
