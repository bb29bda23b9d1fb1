//! Wire types for the control-plane API (`/api/v1/accounts/{accountId}/`).
//!
//! All types match the JSON bodies of the control-plane endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! These are deliberately loose: the control-plane is inconsistent about
//! field presence across releases, so most fields are optional and the
//! interface slot attributes arrive as an untyped `helperFields` bag.
//! `edgesite-core` parses them into strong types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Listing ──────────────────────────────────────────────────────────

/// Wrapper returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    #[serde(default)]
    pub total: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// ── Sites ────────────────────────────────────────────────────────────

/// Site snapshot, from `GET sites/{siteId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSnapshot {
    pub id: String,
    pub name: String,
    pub connection_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub site_location: Option<SiteLocationPayload>,
}

/// Physical location of a site, as stored and accepted by the control-plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLocationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body for `PUT sites/{siteId}/general-details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteGeneralDetailsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub site_location: SiteLocationPayload,
}

// ── Interfaces ───────────────────────────────────────────────────────

/// One interface slot, from `GET sites/{siteId}/interfaces`.
///
/// `index` is whatever the control-plane uses for the slot: a named lane
/// (`"LAN1"`), an `"INT_n"` position, or a bare number. `isDefault` is
/// absent on older control-plane releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSlot {
    pub id: String,
    pub index: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
    /// Loosely-typed attribute bag: `subnet`, `destType`, `localIp`,
    /// `lagMinLinks` (number or numeric string).
    #[serde(default)]
    pub helper_fields: Map<String, Value>,
}

/// LAN-side addressing for an interface update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceLan {
    pub subnet: String,
    pub local_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_subnet: Option<String>,
}

/// Link-aggregation parameters for an interface update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceLag {
    pub min_links: u32,
}

/// Body for `PUT sites/{siteId}/interfaces/{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceUpdate {
    pub dest_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lan: Option<InterfaceLan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<InterfaceLag>,
}

/// Response of an interface update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceUpdateResult {
    pub site_id: String,
    #[serde(default)]
    pub interface_id: Option<String>,
}

// ── Native range ─────────────────────────────────────────────────────

/// DHCP settings as carried on a native range (both directions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpSettingsPayload {
    pub dhcp_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_microsegmentation: Option<bool>,
}

/// The site's native range, from `GET sites/{siteId}/ranges/native`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRange {
    pub id: String,
    #[serde(default)]
    pub interface_id: Option<String>,
    pub subnet: String,
    #[serde(default)]
    pub local_ip: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub vlan: Option<u16>,
    #[serde(default)]
    pub translated_subnet: Option<String>,
    #[serde(default)]
    pub mdns_reflector: Option<bool>,
    #[serde(default)]
    pub range_type: Option<String>,
    #[serde(default)]
    pub dhcp_settings: Option<DhcpSettingsPayload>,
}

/// Body for `PUT ranges/{rangeId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRangeUpdate {
    pub subnet: String,
    pub local_ip: String,
    pub gateway: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_subnet: Option<String>,
    pub mdns_reflector: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_settings: Option<DhcpSettingsPayload>,
}

/// Response of a native range update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeUpdateResult {
    pub id: String,
}

// ── DHCP relay groups ────────────────────────────────────────────────

/// DHCP relay group, from `GET dhcp-relay-groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayGroup {
    pub id: String,
    pub name: String,
}
