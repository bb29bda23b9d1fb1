//! Offline validation of a declared site file.

use serde::Serialize;

use edgesite_core::{DesiredState, DhcpSettings, RelayGroupRef};

use crate::cli::{DeclaredArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// The validated declaration with defaults filled in.
#[derive(Serialize)]
struct Report {
    site_id: String,
    connection_type: String,
    slot: String,
    role: String,
    interface_name: Option<String>,
    lag_min_links: Option<u32>,
    native_subnet: String,
    local_ip: String,
    translated_subnet: Option<String>,
    vlan: Option<u16>,
    mdns_reflector: bool,
    dhcp: String,
}

impl From<&DesiredState> for Report {
    fn from(d: &DesiredState) -> Self {
        Self {
            site_id: d.site_id.clone(),
            connection_type: d.connection_type.to_string(),
            slot: d.slot.to_string(),
            role: d.role.to_string(),
            interface_name: d.interface_name.clone(),
            lag_min_links: d.lag_min_links,
            native_subnet: d.subnet.to_string(),
            local_ip: d.local_ip.to_string(),
            translated_subnet: d.translated_subnet.map(|t| t.to_string()),
            vlan: d.vlan,
            mdns_reflector: d.mdns_reflector,
            dhcp: d.dhcp.as_ref().map_or_else(|| "-".into(), describe_dhcp),
        }
    }
}

pub(crate) fn describe_dhcp(dhcp: &DhcpSettings) -> String {
    match dhcp {
        DhcpSettings::Disabled => dhcp.dhcp_type().to_string(),
        DhcpSettings::Range { ip_range, .. } => format!("{} {ip_range}", dhcp.dhcp_type()),
        DhcpSettings::Relay { group } => match group {
            RelayGroupRef::Id(id) => format!("{} group {id}", dhcp.dhcp_type()),
            RelayGroupRef::Name(name) => format!("{} group '{name}'", dhcp.dhcp_type()),
        },
    }
}

fn detail(r: &Report) -> String {
    let mut lines = vec![
        format!("Site:          {} ({})", r.site_id, r.connection_type),
        format!("Slot:          {} as {}", r.slot, r.role),
        format!("Native range:  {} via {}", r.native_subnet, r.local_ip),
    ];
    if let Some(ref name) = r.interface_name {
        lines.push(format!("Name:          {name}"));
    }
    if let Some(links) = r.lag_min_links {
        lines.push(format!("LAG min links: {links}"));
    }
    if let Some(ref t) = r.translated_subnet {
        lines.push(format!("Translated:    {t}"));
    }
    if let Some(vlan) = r.vlan {
        lines.push(format!("VLAN:          {vlan}"));
    }
    lines.push(format!("DHCP:          {}", r.dhcp));
    lines.join("\n")
}

pub fn handle(args: &DeclaredArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let declared = util::read_declared(&args.file)?;
    let desired = edgesite_core::validate(&declared).map_err(edgesite_core::CoreError::from)?;

    let report = Report::from(&desired);
    let out = output::render_single(global.output, &report, detail)?;
    output::print_output(&out, global.quiet);
    output::status(&format!("{} is valid", args.file.display()), global.quiet);
    Ok(())
}
