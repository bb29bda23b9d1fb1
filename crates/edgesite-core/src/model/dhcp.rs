// ── DHCP settings ──
//
// `DhcpConfig` is the flat form a user declares (and the form persisted
// in observed state); `DhcpSettings` is the validated tagged variant the
// engine submits.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// DHCP mode of the native range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum DhcpType {
    #[serde(rename = "DHCP_DISABLED")]
    #[strum(serialize = "DHCP_DISABLED")]
    Disabled,
    #[serde(rename = "DHCP_RANGE")]
    #[strum(serialize = "DHCP_RANGE")]
    Range,
    #[serde(rename = "DHCP_RELAY")]
    #[strum(serialize = "DHCP_RELAY")]
    Relay,
}

/// Declared / observed DHCP settings, one field per wire attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpConfig {
    pub dhcp_type: DhcpType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_microsegmentation: Option<bool>,
}

impl DhcpConfig {
    pub fn disabled() -> Self {
        Self {
            dhcp_type: DhcpType::Disabled,
            ip_range: None,
            relay_group_id: None,
            relay_group_name: None,
            dhcp_microsegmentation: None,
        }
    }
}

/// Reference to a DHCP relay group, by id or by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayGroupRef {
    Id(String),
    Name(String),
}

/// Validated DHCP settings. Only the fields of the active variant exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhcpSettings {
    Disabled,
    Range {
        ip_range: String,
        microsegmentation: Option<bool>,
    },
    Relay {
        group: RelayGroupRef,
    },
}

impl DhcpSettings {
    pub fn dhcp_type(&self) -> DhcpType {
        match self {
            Self::Disabled => DhcpType::Disabled,
            Self::Range { .. } => DhcpType::Range,
            Self::Relay { .. } => DhcpType::Relay,
        }
    }
}
