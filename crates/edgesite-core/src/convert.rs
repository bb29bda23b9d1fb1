// ── API-to-domain type conversions ──
//
// Bridges raw `edgesite_api` wire types and the canonical
// `edgesite_core::model` types. The slot attribute bag is parsed here and
// nowhere else; unknown or malformed attributes become `None` rather than
// leaking untyped JSON into the engine.

use edgesite_api::types::{self as wire, DhcpSettingsPayload, SiteLocationPayload};
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{
    DestinationRole, DhcpConfig, DhcpSettings, DhcpType, InterfaceSlot, InvalidSlotIndex,
    SiteLocation,
};

// ── Helpers ────────────────────────────────────────────────────────

/// A non-blank string attribute from the helper bag.
fn helper_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `lagMinLinks` arrives as a number on some releases and a numeric
/// string on others.
fn helper_u32(fields: &Map<String, Value>, key: &str) -> Option<u32> {
    match fields.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn blank_to_none(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

// ── Interface slots ────────────────────────────────────────────────

impl TryFrom<&wire::InterfaceSlot> for InterfaceSlot {
    type Error = InvalidSlotIndex;

    fn try_from(raw: &wire::InterfaceSlot) -> Result<Self, Self::Error> {
        let fields = &raw.helper_fields;
        let role = helper_str(fields, "destType").and_then(|t| match t.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                debug!(slot = %raw.index, dest_type = %t, "unrecognized destination type");
                None
            }
        });

        Ok(Self {
            id: raw.id.clone(),
            index: raw.index.parse()?,
            name: blank_to_none(raw.name.as_ref()),
            is_default: raw.is_default,
            role,
            subnet: helper_str(fields, "subnet"),
            local_ip: helper_str(fields, "localIp"),
            lag_min_links: helper_u32(fields, "lagMinLinks"),
        })
    }
}

// ── Location ───────────────────────────────────────────────────────

impl From<&SiteLocationPayload> for SiteLocation {
    fn from(p: &SiteLocationPayload) -> Self {
        Self {
            country_code: p.country_code.clone(),
            state_code: p.state_code.clone(),
            city: p.city.clone(),
            address: p.address.clone(),
            timezone: p.timezone.clone(),
        }
    }
}

// ── DHCP ───────────────────────────────────────────────────────────

/// Raw DHCP settings as echoed by the control-plane. Returns `None` for
/// a DHCP type this engine does not model.
pub(crate) fn dhcp_from_wire(p: &DhcpSettingsPayload) -> Option<DhcpConfig> {
    let dhcp_type: DhcpType = p.dhcp_type.parse().ok()?;
    Some(DhcpConfig {
        dhcp_type,
        ip_range: p.ip_range.clone(),
        relay_group_id: p.relay_group_id.clone(),
        relay_group_name: p.relay_group_name.clone(),
        dhcp_microsegmentation: p.dhcp_microsegmentation,
    })
}

/// Outbound DHCP payload. Only the active variant's fields are set; a
/// relay group must already be resolved to its id.
pub(crate) fn dhcp_to_wire(
    settings: &DhcpSettings,
    relay_group_id: Option<&str>,
) -> DhcpSettingsPayload {
    let mut payload = DhcpSettingsPayload {
        dhcp_type: settings.dhcp_type().to_string(),
        ..DhcpSettingsPayload::default()
    };
    match settings {
        DhcpSettings::Disabled => {}
        DhcpSettings::Range {
            ip_range,
            microsegmentation,
        } => {
            payload.ip_range = Some(ip_range.clone());
            payload.dhcp_microsegmentation = *microsegmentation;
        }
        DhcpSettings::Relay { .. } => {
            payload.relay_group_id = relay_group_id.map(str::to_owned);
        }
    }
    payload
}
