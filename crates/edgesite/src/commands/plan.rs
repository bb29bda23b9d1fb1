//! `plan`: resolve the current default slot and report the stages an
//! apply would run, without changing anything.

use serde::Serialize;

use edgesite_api::ControlPlaneClient;
use edgesite_core::{Plan, Reconciler};

use crate::cli::{GlobalOpts, PlanArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct PlanView {
    site_id: String,
    site_name: String,
    current_slot: String,
    resolved_by: String,
    target_slot: String,
    reassignment: Vec<String>,
    location_update: bool,
}

impl From<&Plan> for PlanView {
    fn from(p: &Plan) -> Self {
        Self {
            site_id: p.site_id.clone(),
            site_name: p.site_name.clone(),
            current_slot: p.current.index().to_string(),
            resolved_by: p.current.source.to_string(),
            target_slot: p.target.to_string(),
            reassignment: p
                .reassignment
                .as_ref()
                .map(|r| r.stages.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
            location_update: p.location_update,
        }
    }
}

fn detail(v: &PlanView, color: bool) -> String {
    let mut lines = vec![
        format!("Site:     {} ({})", v.site_name, v.site_id),
        format!(
            "Default:  {} (resolved by {})",
            output::accent(&v.current_slot, color),
            v.resolved_by
        ),
    ];
    if v.reassignment.is_empty() {
        lines.push(format!("Target:   {} (no reassignment)", v.target_slot));
    } else {
        lines.push(format!(
            "Target:   {}",
            output::warning(&format!("{} (reassignment)", v.target_slot), color)
        ));
        for (n, stage) in v.reassignment.iter().enumerate() {
            lines.push(format!("  {}. {stage}", n + 1));
        }
    }
    if v.location_update {
        lines.push("Location: will be updated".into());
    }
    lines.join("\n")
}

pub async fn handle(
    reconciler: &Reconciler<ControlPlaneClient>,
    args: PlanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let declared = util::read_declared(&args.declared.file)?;
    let prior = match args.state {
        Some(ref path) => util::read_state(path)?,
        None => None,
    };

    let plan = reconciler.plan(&declared, prior.as_ref()).await?;
    let view = PlanView::from(&plan);
    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &view, |v| detail(v, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
