//! `slots`: list a site's interface slots and mark the resolved default.

use tabled::Tabled;

use edgesite_api::ControlPlaneClient;
use edgesite_core::{ConnectionType, InterfaceSlot, Reconciler, SlotIndex};

use crate::cli::{GlobalOpts, SlotsArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Local IP")]
    local_ip: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn row(slot: &InterfaceSlot, default: &SlotIndex, color: bool) -> SlotRow {
    SlotRow {
        index: slot.index.to_string(),
        name: slot.name.clone().unwrap_or_default(),
        role: slot.role.map(|r| r.to_string()).unwrap_or_default(),
        subnet: slot.subnet.clone().unwrap_or_default(),
        local_ip: slot.local_ip.clone().unwrap_or_default(),
        default: if &slot.index == default {
            output::accent("*", color)
        } else {
            String::new()
        },
    }
}

fn parse_connection_type(raw: &str) -> Result<ConnectionType, CliError> {
    raw.parse().map_err(|_| {
        let known: Vec<String> = ConnectionType::selectable()
            .map(|ct| ct.to_string())
            .collect();
        CliError::Validation {
            field: "connection-type".into(),
            reason: format!(
                "unknown connection type '{raw}' (slot-selectable: {})",
                known.join(", ")
            ),
        }
    })
}

pub async fn handle(
    reconciler: &Reconciler<ControlPlaneClient>,
    args: SlotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ct = parse_connection_type(&args.connection_type)?;
    let survey = reconciler.survey(&args.site, ct).await?;

    let color = output::should_color(global.color);
    let default = survey.current.index().clone();
    let out = output::render_list(global.output, &survey.slots, |s| row(s, &default, color))?;
    output::print_output(&out, global.quiet);
    output::status(
        &format!("Default slot {default} (resolved by {})", survey.current.source),
        global.quiet,
    );
    Ok(())
}
