//! `apply`: establish or converge a site, then record the observed state.

use edgesite_api::ControlPlaneClient;
use edgesite_core::{Reconciler, SiteConfig};

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub(crate) fn detail(site: &SiteConfig) -> String {
    let range = &site.native_range;
    let slot = range
        .interface_index
        .as_ref()
        .map_or_else(|| "-".into(), ToString::to_string);
    let mut lines = vec![
        format!(
            "Site:          {} ({})",
            site.site_name.as_deref().unwrap_or("-"),
            site.site_id
        ),
        format!("Type:          {}", site.connection_type),
        format!(
            "Slot:          {slot} {}",
            range.interface_name.as_deref().unwrap_or("")
        ),
        format!("Native range:  {} via {}", range.native_subnet, range.local_ip),
    ];
    if let Some(ref t) = range.translated_subnet {
        lines.push(format!("Translated:    {t}"));
    }
    if let Some(vlan) = range.vlan {
        lines.push(format!("VLAN:          {vlan}"));
    }
    if let Some(ref dhcp) = range.dhcp_settings {
        let extra = dhcp
            .ip_range
            .as_deref()
            .or(dhcp.relay_group_name.as_deref())
            .or(dhcp.relay_group_id.as_deref())
            .unwrap_or("");
        lines.push(format!("DHCP:          {} {extra}", dhcp.dhcp_type));
    }
    if let Some(ref id) = range.range_id {
        lines.push(format!("Range id:      {id}"));
    }
    lines.join("\n")
}

pub async fn handle(
    reconciler: &Reconciler<ControlPlaneClient>,
    args: ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let declared = util::read_declared(&args.declared.file)?;
    let prior = match args.state {
        Some(ref path) => util::read_state(path)?,
        None => None,
    };

    let result = match prior {
        Some(ref prior) => reconciler.converge(&declared, prior).await?,
        None => reconciler.establish(&declared).await?,
    };

    if let Some(ref path) = args.state {
        util::write_state(path, &result.observed)?;
    }

    let color = output::should_color(global.color);
    if let Some((ref from, ref to)) = result.reassigned {
        output::status(
            &format!(
                "Default interface moved from {from} to {}",
                output::accent(&to.to_string(), color)
            ),
            global.quiet,
        );
    }
    if result.location_updated {
        output::status("Site location updated", global.quiet);
    }

    let out = output::render_single(global.output, &result.observed, detail)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
