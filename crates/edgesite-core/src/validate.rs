// ── Constraint validator ──
//
// Pure check of a declared configuration. Runs before any remote call;
// on success it yields the fully-resolved `DesiredState` the rest of the
// engine works from.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::ValidationError;
use crate::model::{
    ConnectionType, DestinationRole, DhcpConfig, DhcpSettings, DhcpType, RelayGroupRef,
    SiteConfig, SlotIndex,
};
use crate::subnet::{check_local_ip, parse_addr, parse_cidr, same_network};

/// A declared configuration that passed validation, with defaults filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub site_id: String,
    pub connection_type: ConnectionType,
    pub slot: SlotIndex,
    pub role: DestinationRole,
    pub interface_name: Option<String>,
    pub lag_min_links: Option<u32>,
    pub subnet: Ipv4Net,
    pub local_ip: Ipv4Addr,
    /// `None` when undeclared or the same network as `subnet`.
    pub translated_subnet: Option<Ipv4Net>,
    pub vlan: Option<u16>,
    pub mdns_reflector: bool,
    pub dhcp: Option<DhcpSettings>,
}

/// Validate `declared`, returning the first inconsistency found.
pub fn validate(declared: &SiteConfig) -> Result<DesiredState, ValidationError> {
    let range = &declared.native_range;
    let ct = declared.connection_type;

    let (local_ip, subnet) = check_local_ip(&range.local_ip, &range.native_subnet)?.ok_or_else(
        || ValidationError::LocalIpNotInSubnet {
            local_ip: range.local_ip.clone(),
            subnet: range.native_subnet.clone(),
        },
    )?;

    let role = range.interface_dest_type.unwrap_or_default();
    check_lag(role, range.lag_min_links)?;

    let default = ct.default_slot();
    let slot = range.interface_index.clone().unwrap_or_else(|| default.clone());
    if !ct.slot_selectable() && slot != default {
        return Err(ValidationError::SlotNotSelectable {
            connection_type: ct,
            requested: slot,
            default,
        });
    }
    if !ct.slot_selectable() && role != DestinationRole::Lan {
        return Err(ValidationError::RoleNotSelectable {
            connection_type: ct,
            role,
        });
    }

    let translated_subnet = match present(range.translated_subnet.as_ref()) {
        Some(t) if same_network(t, &range.native_subnet) => None,
        Some(t) => Some(parse_cidr(t)?),
        None => None,
    };

    let vlan = match range.vlan {
        None | Some(0) => None,
        Some(v @ 1..=4094) => Some(v),
        Some(v) => return Err(ValidationError::InvalidVlan(v)),
    };

    let dhcp = range
        .dhcp_settings
        .as_ref()
        .map(|d| check_dhcp(d, subnet))
        .transpose()?;

    Ok(DesiredState {
        site_id: declared.site_id.clone(),
        connection_type: ct,
        slot,
        role,
        interface_name: present(range.interface_name.as_ref()).map(str::to_owned),
        lag_min_links: range.lag_min_links,
        subnet,
        local_ip,
        translated_subnet,
        vlan,
        mdns_reflector: range.mdns_reflector,
        dhcp,
    })
}

fn check_lag(role: DestinationRole, min_links: Option<u32>) -> Result<(), ValidationError> {
    match (role.is_lag_master(), min_links) {
        (true, None) => Err(ValidationError::LagWithoutMinLinks {
            role: role.to_string(),
        }),
        (false, Some(_)) => Err(ValidationError::MinLinksWithoutLag {
            role: role.to_string(),
        }),
        (true, Some(0)) => Err(ValidationError::InvalidMinLinks),
        _ => Ok(()),
    }
}

fn check_dhcp(dhcp: &DhcpConfig, subnet: Ipv4Net) -> Result<DhcpSettings, ValidationError> {
    let kind = dhcp.dhcp_type;
    let relay_id = present(dhcp.relay_group_id.as_ref());
    let relay_name = present(dhcp.relay_group_name.as_ref());
    let ip_range = present(dhcp.ip_range.as_ref());

    if kind != DhcpType::Relay && (relay_id.is_some() || relay_name.is_some()) {
        return Err(ValidationError::RelayFieldsWithoutRelayType {
            dhcp_type: kind.to_string(),
        });
    }
    if kind != DhcpType::Range && ip_range.is_some() {
        return Err(ValidationError::RangeFieldWithoutRangeType {
            dhcp_type: kind.to_string(),
        });
    }
    if kind != DhcpType::Range && dhcp.dhcp_microsegmentation.is_some() {
        return Err(ValidationError::MicrosegmentationWithoutRangeType {
            dhcp_type: kind.to_string(),
        });
    }

    match kind {
        DhcpType::Disabled => Ok(DhcpSettings::Disabled),
        DhcpType::Range => {
            let ip_range = ip_range.ok_or(ValidationError::RangeTypeWithoutIpRange)?;
            check_ip_range(ip_range, subnet)?;
            Ok(DhcpSettings::Range {
                ip_range: ip_range.to_owned(),
                microsegmentation: dhcp.dhcp_microsegmentation,
            })
        }
        DhcpType::Relay => {
            let group = match (relay_id, relay_name) {
                (Some(id), None) => RelayGroupRef::Id(id.to_owned()),
                (None, Some(name)) => RelayGroupRef::Name(name.to_owned()),
                (Some(_), Some(_)) => return Err(ValidationError::RelayGroupAmbiguous),
                (None, None) => return Err(ValidationError::RelayGroupMissing),
            };
            Ok(DhcpSettings::Relay { group })
        }
    }
}

/// `first-last`, both inside `subnet`, first not after last.
fn check_ip_range(value: &str, subnet: Ipv4Net) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidIpRange {
        value: value.to_owned(),
        subnet: subnet.to_string(),
    };
    let (first, last) = value.split_once('-').ok_or_else(invalid)?;
    let first = parse_addr(first).map_err(|_| invalid())?;
    let last = parse_addr(last).map_err(|_| invalid())?;
    if first > last || !subnet.contains(&first) || !subnet.contains(&last) {
        return Err(invalid());
    }
    Ok(())
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
