//! Named control-plane accounts for edgesite.
//!
//! A `config.toml` holds one profile per account. Loading layers built-in
//! defaults, the file and `EDGESITE_*` variables; API keys come from a
//! named env var, the OS keyring or the file, in that order. The CLI turns
//! the selected profile into an `edgesite_core::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgesite_core::{ClientConfig, TlsVerification};

/// Keyring service holding API keys; see [`keyring_user`].
pub const KEYRING_SERVICE: &str = "edgesite";

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "EDGESITE_";

/// Keyring user under which a profile's API key is stored.
pub fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-key")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' has no API key (env var, keyring or config file)")]
    NoCredentials { profile: String },

    #[error("cannot encode config as TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("cannot read config: {0}")]
    Load(Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

// ── File layout ─────────────────────────────────────────────────────

/// Contents of `config.toml`.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Accounts keyed by profile name.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Settings a profile inherits unless it overrides them.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    /// Output format name, as accepted by `--output`.
    pub output: String,
    pub insecure: bool,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".into(),
            insecure: false,
            timeout: 30,
        }
    }
}

/// A named control-plane account.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL, e.g. `https://cp.example.net`.
    pub endpoint: String,
    pub account_id: String,
    /// Plaintext key; only read when neither env var nor keyring has one.
    pub api_key: Option<String>,
    /// Name of the env var carrying the key.
    pub api_key_env: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub insecure: Option<bool>,
    pub timeout: Option<u64>,
}

// ── Load / save ─────────────────────────────────────────────────────

/// Platform config location, `~/.config/edgesite/config.toml` on Linux.
pub fn config_path() -> PathBuf {
    match ProjectDirs::from("com", "edgesite", "edgesite") {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILE),
        None => std::env::var_os("HOME")
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".config/edgesite")
            .join(CONFIG_FILE),
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`; a missing file leaves the built-in defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(ConfigError::from)
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(cfg)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}

// ── Profile → ClientConfig ──────────────────────────────────────────

fn key_from_env(profile: &Profile) -> Option<String> {
    profile
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
}

fn key_from_keyring(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .and_then(|entry| entry.get_password())
        .ok()
}

/// API key for a profile. CLI flags are applied by the caller.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    key_from_env(profile)
        .or_else(|| key_from_keyring(profile_name))
        .or_else(|| profile.api_key.clone())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// TLS strategy for a profile: `insecure` wins over a custom CA.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    match (profile.insecure.unwrap_or(defaults.insecure), &profile.ca_cert) {
        (true, _) => TlsVerification::DangerAcceptInvalid,
        (false, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (false, None) => TlsVerification::SystemDefaults,
    }
}

pub fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let endpoint = parse_endpoint(&profile.endpoint)?;
    if profile.account_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "account_id".into(),
            reason: format!("profile '{profile_name}' has no account id"),
        });
    }

    Ok(ClientConfig {
        endpoint,
        account_id: profile.account_id.clone(),
        api_key: resolve_api_key(profile, profile_name)?,
        tls: tls_for(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}
