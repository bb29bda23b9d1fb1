//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, KEYRING_SERVICE};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of the config that is safe to print.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(REDACTED.into());
        }
    }
    cfg
}

fn keyring_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config()?);
            let body = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            })?;
            output::print_output(&body, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            let default = cfg.default_profile.unwrap_or_default();
            let lines: Vec<String> = names
                .into_iter()
                .map(|n| if n == default { format!("{n} (default)") } else { n })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            endpoint,
            account,
            api_key_env,
            default,
        } => {
            edgesite_config::parse_endpoint(&endpoint)?;
            let mut cfg = config::load_config()?;
            let profile = cfg.profiles.entry(name.clone()).or_default();
            profile.endpoint = endpoint;
            profile.account_id = account;
            if api_key_env.is_some() {
                profile.api_key_env = api_key_env;
            }
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;
            output::status(
                &format!("Profile '{name}' saved to {}", config::config_path().display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetKey { name } => {
            let key = rpassword::prompt_password(format!("API key for '{name}': "))?;
            if key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }
            let user = edgesite_config::keyring_user(&name);
            let entry = keyring::Entry::new(KEYRING_SERVICE, &user).map_err(keyring_err)?;
            entry.set_password(key.trim()).map_err(keyring_err)?;
            output::status("API key stored in system keyring", global.quiet);
            Ok(())
        }
    }
}
