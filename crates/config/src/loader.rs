use std::path::Path;

use {
    regex::{Captures, Regex},
    tracing::{debug, warn},
};

use crate::schema::{VerifyFlow, VouchConfig};

/// Default config file name, looked up in the working directory.
const CONFIG_FILENAME: &str = "vouch.toml";

/// Load config from the given TOML file.
pub fn load_config(path: &Path) -> anyhow::Result<VouchConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Load from an explicit path, or `./vouch.toml`, falling back to defaults
/// when no file exists. Environment overrides are applied either way.
pub fn discover_and_load(explicit: Option<&Path>) -> VouchConfig {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| CONFIG_FILENAME.into());

    let mut cfg = if path.exists() {
        match load_config(&path) {
            Ok(cfg) => {
                debug!(path = %path.display(), "loaded config");
                cfg
            },
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to load config, using defaults");
                VouchConfig::default()
            },
        }
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        VouchConfig::default()
    };

    apply_env_overrides(&mut cfg);
    cfg
}

/// Replace `${ENV_VAR}` placeholders in config text.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let Ok(placeholder) = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return input.to_string();
    };
    placeholder
        .replace_all(input, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Apply `VOUCH_*` environment overrides on top of the loaded file.
pub fn apply_env_overrides(cfg: &mut VouchConfig) {
    apply_overrides_with(cfg, |name| std::env::var(name).ok());
}

fn apply_overrides_with(cfg: &mut VouchConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("VOUCH_BIND") {
        cfg.server.bind = v;
    }
    if let Some(v) = lookup("VOUCH_PORT")
        && let Ok(port) = v.parse()
    {
        cfg.server.port = port;
    }
    if let Some(v) = lookup("VOUCH_WHATSAPP_VERIFY_TOKEN") {
        cfg.whatsapp.verify_token = v;
    }
    if let Some(v) = lookup("VOUCH_WHATSAPP_API_TOKEN") {
        cfg.whatsapp.api_token = v;
    }
    if let Some(v) = lookup("VOUCH_WHATSAPP_PHONE_NUMBER_ID") {
        cfg.whatsapp.phone_number_id = v;
    }
    if let Some(v) = lookup("VOUCH_WHATSAPP_APP_SECRET") {
        cfg.whatsapp.app_secret = v;
    }
    if let Some(v) = lookup("VOUCH_DIRECTORY_BASE_URL") {
        cfg.directory.base_url = v;
    }
    if let Some(v) = lookup("VOUCH_VERIFY_FLOW") {
        match v.to_lowercase().as_str() {
            "otp" => cfg.verify.flow = VerifyFlow::Otp,
            "direct" => cfg.verify.flow = VerifyFlow::Direct,
            other => warn!(flow = other, "unknown VOUCH_VERIFY_FLOW, keeping configured value"),
        }
    }
}
