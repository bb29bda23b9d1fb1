//! CLI configuration: a thin layer over `edgesite_config` that applies
//! `GlobalOpts` overrides (--endpoint, --account, --api-key, ...).

use std::time::Duration;

use secrecy::SecretString;

use edgesite_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use edgesite_config::{
    Config, KEYRING_SERVICE, Profile, config_path, load_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the client configuration for this invocation.
///
/// Flags win over the profile. Without a profile, the endpoint, account
/// and API key must all come from flags or the environment.
pub fn client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let endpoint = global
        .endpoint
        .as_deref()
        .or(profile.map(|p| p.endpoint.as_str()))
        .ok_or_else(|| CliError::Validation {
            field: "endpoint".into(),
            reason: format!(
                "no endpoint given and no profile '{profile_name}' in {}",
                config_path().display()
            ),
        })?;
    let endpoint = edgesite_config::parse_endpoint(endpoint)?;

    let account_id = global
        .account
        .clone()
        .or_else(|| profile.map(|p| p.account_id.clone()))
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "account".into(),
            reason: "no account id given".into(),
        })?;

    let api_key = resolve_api_key_with_flag(profile, &profile_name, global)?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        profile.map_or_else(
            || {
                if cfg.defaults.insecure {
                    TlsVerification::DangerAcceptInvalid
                } else {
                    TlsVerification::SystemDefaults
                }
            },
            |p| edgesite_config::tls_for(p, &cfg.defaults),
        )
    };

    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    Ok(ClientConfig {
        endpoint,
        account_id,
        api_key,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

/// The `--api-key` flag first, then the profile's credential chain.
fn resolve_api_key_with_flag(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref key) = global.api_key {
        return Ok(SecretString::from(key.clone()));
    }
    match profile {
        Some(p) => Ok(edgesite_config::resolve_api_key(p, profile_name)?),
        None => Err(CliError::NoCredentials {
            profile: profile_name.into(),
        }),
    }
}
