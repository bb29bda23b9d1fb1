// ── State hydrator ──
//
// Reads the converged remote state back into a `SiteConfig`. Every field
// with an ambiguous encoding passes through the normalization policy,
// using a reference configuration to settle absent-vs-empty.

use edgesite_api::types::{SiteLocationPayload, SiteSnapshot};
use tracing::debug;

use crate::control::ControlPlane;
use crate::convert::dhcp_from_wire;
use crate::error::{CoreError, Step};
use crate::model::{ConnectionType, DhcpConfig, NativeRangeConfig, SiteConfig, SiteLocation};
use crate::normalize::{Field, ReadContext, normalize_read};
use crate::resolve::resolve_default_slot;

/// Read `snapshot`'s slots and native range and build the observed
/// configuration.
///
/// `reference` is the declared configuration on establish / converge and
/// the prior observed configuration on refresh.
pub async fn hydrate<C: ControlPlane>(
    cp: &C,
    snapshot: &SiteSnapshot,
    connection_type: ConnectionType,
    reference: &SiteConfig,
) -> Result<SiteConfig, CoreError> {
    let site = snapshot.id.as_str();

    let survey = resolve_default_slot(cp, site, connection_type).await?;
    let range = cp
        .get_native_range(site)
        .await
        .map_err(|e| CoreError::remote(site, Step::ReadNativeRange, e))?;

    let slot = survey.current.slot;
    let wanted = &reference.native_range;
    let dhcp = range.dhcp_settings.as_ref().and_then(dhcp_from_wire);

    let ctx = ReadContext {
        native_subnet: Some(range.subnet.as_str()),
        dhcp_type: dhcp.as_ref().map(|d| d.dhcp_type),
        role: slot.role,
    };

    let local_ip = range
        .local_ip
        .clone()
        .or_else(|| range.gateway.clone())
        .or_else(|| slot.local_ip.clone())
        .ok_or_else(|| CoreError::InvalidResponse {
            site: site.to_owned(),
            message: format!("native range {} has no local IP", range.id),
        })?;

    let native_range = NativeRangeConfig {
        interface_index: Some(slot.index.clone()),
        interface_name: normalize_read(
            Field::InterfaceName,
            slot.name.clone(),
            wanted.interface_name.as_ref(),
            &ctx,
        ),
        interface_dest_type: slot.role,
        lag_min_links: normalize_read(
            Field::LagMinLinks,
            slot.lag_min_links,
            wanted.lag_min_links.as_ref(),
            &ctx,
        ),
        native_subnet: range.subnet.clone(),
        local_ip,
        translated_subnet: normalize_read(
            Field::TranslatedSubnet,
            range.translated_subnet.clone(),
            wanted.translated_subnet.as_ref(),
            &ctx,
        ),
        vlan: normalize_read(Field::Vlan, range.vlan, wanted.vlan.as_ref(), &ctx),
        mdns_reflector: range.mdns_reflector.unwrap_or(false),
        dhcp_settings: dhcp.map(|d| normalize_dhcp(d, wanted.dhcp_settings.as_ref(), &ctx)),
        interface_id: Some(slot.id.clone()),
        range_id: Some(range.id.clone()),
        range_type: range.range_type.clone(),
    };

    debug!(site, slot = %slot.index, range = %range.id, "hydrated site state");

    Ok(SiteConfig {
        site_id: snapshot.id.clone(),
        connection_type,
        description: normalize_read(
            Field::Description,
            snapshot.description.clone(),
            reference.description.as_ref(),
            &ctx,
        ),
        location: snapshot
            .site_location
            .as_ref()
            .and_then(|l| normalize_location(l, reference.location.as_ref())),
        site_name: Some(snapshot.name.clone()),
        native_range,
    })
}

fn normalize_dhcp(
    remote: DhcpConfig,
    reference: Option<&DhcpConfig>,
    ctx: &ReadContext<'_>,
) -> DhcpConfig {
    DhcpConfig {
        dhcp_type: remote.dhcp_type,
        ip_range: normalize_read(
            Field::DhcpIpRange,
            remote.ip_range,
            reference.and_then(|r| r.ip_range.as_ref()),
            ctx,
        ),
        relay_group_id: normalize_read(
            Field::DhcpRelayGroupId,
            remote.relay_group_id,
            reference.and_then(|r| r.relay_group_id.as_ref()),
            ctx,
        ),
        relay_group_name: normalize_read(
            Field::DhcpRelayGroupName,
            remote.relay_group_name,
            reference.and_then(|r| r.relay_group_name.as_ref()),
            ctx,
        ),
        dhcp_microsegmentation: normalize_read(
            Field::DhcpMicrosegmentation,
            remote.dhcp_microsegmentation,
            reference.and_then(|r| r.dhcp_microsegmentation.as_ref()),
            ctx,
        ),
    }
}

/// `None` when every field reads as absent.
pub(crate) fn normalize_location(
    remote: &SiteLocationPayload,
    reference: Option<&SiteLocation>,
) -> Option<SiteLocation> {
    let ctx = ReadContext::default();
    let read = |field, value: Option<&String>, wanted: Option<&String>| {
        normalize_read(field, value.cloned(), wanted, &ctx)
    };

    let location = SiteLocation {
        country_code: read(
            Field::LocationCountryCode,
            remote.country_code.as_ref(),
            reference.and_then(|r| r.country_code.as_ref()),
        ),
        state_code: read(
            Field::LocationStateCode,
            remote.state_code.as_ref(),
            reference.and_then(|r| r.state_code.as_ref()),
        ),
        city: read(
            Field::LocationCity,
            remote.city.as_ref(),
            reference.and_then(|r| r.city.as_ref()),
        ),
        address: read(
            Field::LocationAddress,
            remote.address.as_ref(),
            reference.and_then(|r| r.address.as_ref()),
        ),
        timezone: read(
            Field::LocationTimezone,
            remote.timezone.as_ref(),
            reference.and_then(|r| r.timezone.as_ref()),
        ),
    };

    (location != SiteLocation::default()).then_some(location)
}
