// ── Range / interface updater ──
//
// Applies the desired addressing, VLAN, DHCP and interface role to the
// native range and the default slot. Two remote writes, range first.

use edgesite_api::types::{
    InterfaceLag, InterfaceLan, InterfaceUpdate, NativeRangeUpdate, SiteGeneralDetailsUpdate,
    SiteLocationPayload,
};
use tracing::{debug, info};

use crate::control::ControlPlane;
use crate::convert::dhcp_to_wire;
use crate::error::{CoreError, Step};
use crate::model::{DhcpSettings, RelayGroupRef, SiteConfig, SiteLocation};
use crate::normalize::{Field, normalize_write};
use crate::validate::DesiredState;

/// Interface record for the default slot. The LAN section is sent only
/// for roles that carry addressing; the LAG section only with min-links.
pub fn interface_update(desired: &DesiredState) -> InterfaceUpdate {
    InterfaceUpdate {
        dest_type: desired.role.to_string(),
        name: desired.interface_name.clone(),
        lan: desired.role.carries_lan().then(|| InterfaceLan {
            subnet: desired.subnet.to_string(),
            local_ip: desired.local_ip.to_string(),
            translated_subnet: desired.translated_subnet.map(|t| t.to_string()),
        }),
        lag: desired
            .lag_min_links
            .map(|min_links| InterfaceLag { min_links }),
    }
}

/// Native range record. `relay_group_id` must already be resolved when
/// DHCP relay is requested.
pub fn range_update(desired: &DesiredState, relay_group_id: Option<&str>) -> NativeRangeUpdate {
    let local_ip = desired.local_ip.to_string();
    NativeRangeUpdate {
        subnet: desired.subnet.to_string(),
        gateway: local_ip.clone(),
        local_ip,
        vlan: desired.vlan,
        translated_subnet: desired.translated_subnet.map(|t| t.to_string()),
        mdns_reflector: desired.mdns_reflector,
        dhcp_settings: desired
            .dhcp
            .as_ref()
            .map(|d| dhcp_to_wire(d, relay_group_id)),
    }
}

/// Resolve a DHCP relay group reference to its id.
pub async fn resolve_relay_group<C: ControlPlane>(
    cp: &C,
    site_id: &str,
    group: &RelayGroupRef,
) -> Result<String, CoreError> {
    let name = match group {
        RelayGroupRef::Id(id) => return Ok(id.clone()),
        RelayGroupRef::Name(name) => name,
    };

    let groups = cp.find_relay_groups(name).await.map_err(|e| {
        CoreError::remote(
            site_id,
            Step::LookupRelayGroup { name: name.clone() },
            e,
        )
    })?;

    // The lookup filters by substring; only an exact name counts.
    let id = groups
        .into_iter()
        .find(|g| &g.name == name)
        .map(|g| g.id)
        .ok_or_else(|| CoreError::RelayGroupNotFound { name: name.clone() })?;
    debug!(site = site_id, group = %name, id = %id, "resolved DHCP relay group");
    Ok(id)
}

/// Outcome of [`apply_native_range`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRange {
    pub range_id: String,
    pub relay_group_id: Option<String>,
}

/// Write the native range, then the default slot's interface record.
pub async fn apply_native_range<C: ControlPlane>(
    cp: &C,
    desired: &DesiredState,
) -> Result<AppliedRange, CoreError> {
    let site = desired.site_id.as_str();

    let relay_group_id = match &desired.dhcp {
        Some(DhcpSettings::Relay { group }) => Some(resolve_relay_group(cp, site, group).await?),
        _ => None,
    };

    let range = cp
        .get_native_range(site)
        .await
        .map_err(|e| CoreError::remote(site, Step::ReadNativeRange, e))?;

    info!(site, range = %range.id, subnet = %desired.subnet, "updating native range");
    let body = range_update(desired, relay_group_id.as_deref());
    cp.update_native_range(&range.id, &body)
        .await
        .map_err(|e| CoreError::remote(site, Step::UpdateNativeRange, e))?;

    info!(site, slot = %desired.slot, role = %desired.role, "updating interface");
    let body = interface_update(desired);
    cp.update_interface(site, &desired.slot.to_string(), &body)
        .await
        .map_err(|e| {
            CoreError::remote(
                site,
                Step::UpdateInterface {
                    slot: desired.slot.clone(),
                },
                e,
            )
        })?;

    Ok(AppliedRange {
        range_id: range.id,
        relay_group_id,
    })
}

// ── General details ──────────────────────────────────────────────────

fn blank_to_none(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Whether submitting `declared` for `field` would change `previous`.
/// An omitted field without a clearing sentinel is unmanaged.
fn field_changed(field: Field, declared: Option<&String>, previous: Option<&String>) -> bool {
    let previous = blank_to_none(previous);
    normalize_write(field, declared.map(String::as_str), previous)
        .is_some_and(|v| Some(v.trim()).filter(|t| !t.is_empty()) != previous)
}

fn location_changed(declared: &SiteLocation, previous: Option<&SiteLocation>) -> bool {
    let empty = SiteLocation::default();
    let prev = previous.unwrap_or(&empty);
    [
        (Field::LocationCountryCode, &declared.country_code, &prev.country_code),
        (Field::LocationStateCode, &declared.state_code, &prev.state_code),
        (Field::LocationCity, &declared.city, &prev.city),
        (Field::LocationAddress, &declared.address, &prev.address),
        (Field::LocationTimezone, &declared.timezone, &prev.timezone),
    ]
    .into_iter()
    .any(|(field, d, p)| field_changed(field, d.as_ref(), p.as_ref()))
}

/// Site description / location write, or `None` when nothing managed
/// differs from `previous_*`. An undeclared location or description is
/// left alone.
pub fn general_details_update(
    declared: &SiteConfig,
    previous_description: Option<&str>,
    previous_location: Option<&SiteLocation>,
) -> Option<SiteGeneralDetailsUpdate> {
    let description_changed = blank_to_none(declared.description.as_ref())
        .is_some_and(|d| Some(d) != previous_description.map(str::trim));
    let location_changed = declared
        .location
        .as_ref()
        .is_some_and(|loc| location_changed(loc, previous_location));
    if !description_changed && !location_changed {
        return None;
    }

    let empty = SiteLocation::default();
    let source = declared.location.as_ref().or(previous_location).unwrap_or(&empty);
    let prev = previous_location.unwrap_or(&empty);
    let write = |field, value: Option<&String>, previous: Option<&String>| {
        normalize_write(field, value.map(String::as_str), previous.map(String::as_str))
    };

    Some(SiteGeneralDetailsUpdate {
        description: blank_to_none(declared.description.as_ref()).map(str::to_owned),
        site_location: SiteLocationPayload {
            country_code: write(
                Field::LocationCountryCode,
                source.country_code.as_ref(),
                prev.country_code.as_ref(),
            ),
            state_code: write(
                Field::LocationStateCode,
                source.state_code.as_ref(),
                prev.state_code.as_ref(),
            ),
            timezone: write(
                Field::LocationTimezone,
                source.timezone.as_ref(),
                prev.timezone.as_ref(),
            ),
            city: write(Field::LocationCity, source.city.as_ref(), prev.city.as_ref()),
            address: write(
                Field::LocationAddress,
                source.address.as_ref(),
                prev.address.as_ref(),
            ),
        },
    })
}
