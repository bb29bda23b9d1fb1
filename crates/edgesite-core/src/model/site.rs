// ── Site configuration ──
//
// One record shape serves as both declared configuration (user intent)
// and observed configuration (hydrated from the control-plane). Fields
// marked "observed only" are filled by hydration and ignored on input.

use serde::{Deserialize, Serialize};

use super::connection::ConnectionType;
use super::dhcp::DhcpConfig;
use super::slot::{DestinationRole, SlotIndex};

/// Physical location of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// The native range and the interface slot backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRangeConfig {
    /// Slot that should hold the default-interface role. `None` means
    /// the connection type's documented default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_index: Option<SlotIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_dest_type: Option<DestinationRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag_min_links: Option<u32>,

    pub native_subnet: String,
    pub local_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(default)]
    pub mdns_reflector: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_settings: Option<DhcpConfig>,

    /// Observed only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<String>,
    /// Observed only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_id: Option<String>,
    /// Observed only; informational tag returned by the control-plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_type: Option<String>,
}

/// Declared or observed configuration of one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site_id: String,
    pub connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` leaves the location unmanaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SiteLocation>,
    /// Observed only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    pub native_range: NativeRangeConfig,
}
