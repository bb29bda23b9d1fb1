//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use edgesite_config::ConfigError;
use edgesite_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VALIDATION: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const UNSUPPORTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the control-plane")]
    #[diagnostic(
        code(edgesite::connection_failed),
        help(
            "Check the endpoint and your network.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(edgesite::auth_failed),
        help("Verify the API key. Store a new one with: edgesite config set-key <profile>")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(edgesite::no_credentials),
        help(
            "Store a key with: edgesite config set-key {profile}\n\
             Or set the EDGESITE_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(edgesite::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Declared configuration ───────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(edgesite::invalid_declaration),
        help("Fix the declared site file; nothing was sent to the control-plane.")
    )]
    InvalidDeclaration { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(edgesite::immutable),
        help("The site must be destroyed and recreated to change this.")
    )]
    Immutable { message: String },

    // ── Remote state ─────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(edgesite::unsupported),
        help("The control-plane cannot move the default interface for this site.")
    )]
    Unsupported { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(edgesite::remote_step),
        help(
            "The site may be partially updated. Running apply again re-resolves \
             the current default slot and finishes the change."
        )
    )]
    RemoteStep { message: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(edgesite::api_error))]
    ApiError { code: String, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(edgesite::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: edgesite config set-profile"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(edgesite::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(edgesite::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(edgesite::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(edgesite::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    #[diagnostic(code(edgesite::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidDeclaration { .. } | Self::Immutable { .. } => exit_code::VALIDATION,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::Config(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(_)
            | CoreError::UnknownSlot { .. }
            | CoreError::ConnectionTypeMismatch { .. } => CliError::InvalidDeclaration { message },

            CoreError::ConnectionTypeChanged { .. } | CoreError::SiteMismatch { .. } => {
                CliError::Immutable { message }
            }

            CoreError::SiteNotFound { site } => CliError::NotFound {
                resource_type: "site".into(),
                identifier: site,
            },

            CoreError::RelayGroupNotFound { name } => CliError::NotFound {
                resource_type: "DHCP relay group".into(),
                identifier: name,
            },

            CoreError::FeatureUnavailable { .. } => CliError::Unsupported { message },

            CoreError::Remote { source, .. } => match source {
                edgesite_api::Error::InvalidApiKey | edgesite_api::Error::Authentication { .. } => {
                    CliError::AuthFailed { message }
                }
                edgesite_api::Error::Tls(_) => CliError::ConnectionFailed { reason: message },
                edgesite_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                    CliError::ConnectionFailed { reason: message }
                }
                _ => CliError::RemoteStep { message },
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Resolution { .. } | CoreError::InvalidResponse { .. } => {
                CliError::ApiError {
                    code: "unexpected_state".into(),
                    message,
                }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
