// ── Core error types ──
//
// Errors surfaced by the reconciliation engine. Every remote failure is
// wrapped with the site and the step it happened at, so a caller can tell
// a half-finished reassignment apart from a failed read. The
// `From<edgesite_api::Error>` impl covers calls made outside a
// reconciliation step (e.g. building the client).

use std::fmt;

use thiserror::Error;

use crate::model::{ConnectionType, DestinationRole, SlotIndex};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local (no I/O performed) ─────────────────────────────────────
    #[error("Invalid site configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(
        "Connection type of site {site} cannot change from {current} to {requested}; the site must be recreated"
    )]
    ConnectionTypeChanged {
        site: String,
        current: ConnectionType,
        requested: ConnectionType,
    },

    #[error("Declared site {declared} does not match the tracked site {tracked}")]
    SiteMismatch { declared: String, tracked: String },

    // ── Remote state ─────────────────────────────────────────────────
    #[error("Site not found: {site}")]
    SiteNotFound { site: String },

    #[error(
        "Site {site}: no interface slot is flagged as default and none matches the expected default {expected}"
    )]
    Resolution { site: String, expected: SlotIndex },

    #[error("Site {site}: slot {slot} does not exist for connection type {connection_type}")]
    UnknownSlot {
        site: String,
        slot: SlotIndex,
        connection_type: ConnectionType,
    },

    #[error("Site {site}: control-plane connection type {remote} does not match declared {declared}")]
    ConnectionTypeMismatch {
        site: String,
        remote: String,
        declared: ConnectionType,
    },

    #[error("Site {site}: default interface reassignment is not available: {reason}")]
    FeatureUnavailable { site: String, reason: String },

    #[error("DHCP relay group not found: {name}")]
    RelayGroupNotFound { name: String },

    #[error("Site {site}: unexpected control-plane response: {message}")]
    InvalidResponse { site: String, message: String },

    // ── Remote calls ─────────────────────────────────────────────────
    #[error("Site {site}: {step} failed: {source}")]
    Remote {
        site: String,
        step: Step,
        #[source]
        source: edgesite_api::Error,
    },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot connect to control-plane: {reason}")]
    ConnectionFailed { reason: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn remote(site: &str, step: Step, source: edgesite_api::Error) -> Self {
        Self::Remote {
            site: site.to_owned(),
            step,
            source,
        }
    }

    /// Whether running the whole operation again may succeed without the
    /// caller changing anything. Validation, resolution and
    /// feature-availability failures never qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { source, .. } => source.is_transient(),
            Self::ConnectionFailed { .. } => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500 || s == 429),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<edgesite_api::Error> for CoreError {
    fn from(err: edgesite_api::Error) -> Self {
        match err {
            edgesite_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            edgesite_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            edgesite_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::ConnectionFailed {
                    reason: e.to_string(),
                }
            }
            edgesite_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
                code: None,
                status: e.status().map(|s| s.as_u16()),
            },
            edgesite_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            edgesite_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            edgesite_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: Some("rate_limited".into()),
                status: Some(429),
            },
            edgesite_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            edgesite_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Deserialization error: {message}"),
                code: None,
                status: None,
            },
        }
    }
}

// ── Step ─────────────────────────────────────────────────────────────

/// The remote call a reconciliation was making when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    ReadSite,
    ListSlots,
    ListLagMembers,
    StagePlaceholder { slot: SlotIndex },
    DrainLagMember { slot: SlotIndex },
    DisableCurrentDefault { slot: SlotIndex },
    ApplyTargetSlot { slot: SlotIndex },
    ReadNativeRange,
    UpdateNativeRange,
    UpdateInterface { slot: SlotIndex },
    LookupRelayGroup { name: String },
    UpdateLocation,
    RemoveSite,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadSite => f.write_str("reading site"),
            Self::ListSlots => f.write_str("listing interface slots"),
            Self::ListLagMembers => f.write_str("listing LAG members"),
            Self::StagePlaceholder { slot } => write!(f, "staging placeholder on {slot}"),
            Self::DrainLagMember { slot } => write!(f, "disabling LAG member {slot}"),
            Self::DisableCurrentDefault { slot } => {
                write!(f, "disabling current default slot {slot}")
            }
            Self::ApplyTargetSlot { slot } => write!(f, "configuring new default slot {slot}"),
            Self::ReadNativeRange => f.write_str("reading native range"),
            Self::UpdateNativeRange => f.write_str("updating native range"),
            Self::UpdateInterface { slot } => write!(f, "updating interface {slot}"),
            Self::LookupRelayGroup { name } => write!(f, "looking up DHCP relay group '{name}'"),
            Self::UpdateLocation => f.write_str("updating site location"),
            Self::RemoveSite => f.write_str("removing site"),
        }
    }
}

// ── Validation errors ────────────────────────────────────────────────

/// Rejection of an internally inconsistent declared configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("local IP {local_ip} is not inside subnet {subnet}")]
    LocalIpNotInSubnet { local_ip: String, subnet: String },

    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("interface role {role} requires lag_min_links")]
    LagWithoutMinLinks { role: String },

    #[error("lag_min_links is only valid for LAN_LAG_MASTER roles, not {role}")]
    MinLinksWithoutLag { role: String },

    #[error("lag_min_links must be at least 1")]
    InvalidMinLinks,

    #[error(
        "connection type {connection_type} does not allow selecting interface {requested}; only the default {default} is permitted"
    )]
    SlotNotSelectable {
        connection_type: ConnectionType,
        requested: SlotIndex,
        default: SlotIndex,
    },

    #[error("connection type {connection_type} only supports the LAN interface role, not {role}")]
    RoleNotSelectable {
        connection_type: ConnectionType,
        role: DestinationRole,
    },

    #[error("dhcp relay_group_id / relay_group_name require dhcp_type DHCP_RELAY, got {dhcp_type}")]
    RelayFieldsWithoutRelayType { dhcp_type: String },

    #[error("dhcp ip_range requires dhcp_type DHCP_RANGE, got {dhcp_type}")]
    RangeFieldWithoutRangeType { dhcp_type: String },

    #[error("dhcp_microsegmentation requires dhcp_type DHCP_RANGE, got {dhcp_type}")]
    MicrosegmentationWithoutRangeType { dhcp_type: String },

    #[error("dhcp_type DHCP_RANGE requires ip_range")]
    RangeTypeWithoutIpRange,

    #[error("dhcp_type DHCP_RELAY requires relay_group_id or relay_group_name")]
    RelayGroupMissing,

    #[error("dhcp relay_group_id and relay_group_name are mutually exclusive")]
    RelayGroupAmbiguous,

    #[error("dhcp ip_range '{value}' must be 'first-last' inside {subnet}")]
    InvalidIpRange { value: String, subnet: String },

    #[error("vlan {0} is outside 1..=4094")]
    InvalidVlan(u16),
}

/// Failure of the subnet / local-IP checker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid IPv4 address '{value}'")]
    InvalidAddress { value: String },

    #[error("invalid CIDR block '{value}'")]
    InvalidCidr { value: String },
}
