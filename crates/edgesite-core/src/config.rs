// ── Runtime connection configuration ──
//
// These types describe *how* to reach the control-plane. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds a `ClientConfig` from a profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use edgesite_api::{ControlPlaneClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (lab proxies with self-signed certs).
    DangerAcceptInvalid,
}

/// Everything needed to talk to one control-plane account.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Control-plane endpoint (e.g., `https://api.example.net`).
    pub endpoint: Url,
    pub account_id: String,
    pub api_key: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this account.
    pub fn connect(&self) -> Result<ControlPlaneClient, CoreError> {
        if self.account_id.trim().is_empty() {
            return Err(CoreError::Config {
                message: "account id is empty".into(),
            });
        }
        Ok(ControlPlaneClient::from_api_key(
            self.endpoint.as_str(),
            &self.account_id,
            &self.api_key,
            &self.transport(),
        )?)
    }
}
