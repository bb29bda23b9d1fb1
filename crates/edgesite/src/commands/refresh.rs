//! `refresh`: re-read a tracked site and rewrite its state file. A site
//! that no longer exists drops the state file.

use edgesite_api::ControlPlaneClient;
use edgesite_core::Reconciler;

use crate::cli::{GlobalOpts, RefreshArgs};
use crate::error::CliError;
use crate::output;

use super::{apply, util};

pub async fn handle(
    reconciler: &Reconciler<ControlPlaneClient>,
    args: RefreshArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let prior = util::read_state(&args.state)?.ok_or_else(|| CliError::NotFound {
        resource_type: "state file".into(),
        identifier: args.state.display().to_string(),
    })?;

    match reconciler.read(&prior).await? {
        Some(observed) => {
            util::write_state(&args.state, &observed)?;
            if observed != prior {
                output::status("Observed state changed since the last run", global.quiet);
            }
            let out = output::render_single(global.output, &observed, apply::detail)?;
            output::print_output(&out, global.quiet);
        }
        None => {
            util::remove_state(&args.state)?;
            output::status(
                &format!("Site {} no longer exists; state removed", prior.site_id),
                global.quiet,
            );
        }
    }
    Ok(())
}
