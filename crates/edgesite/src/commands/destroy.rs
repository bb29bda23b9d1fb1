//! `destroy`: idempotent site removal.

use edgesite_api::ControlPlaneClient;
use edgesite_core::Reconciler;

use crate::cli::{DestroyArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    reconciler: &Reconciler<ControlPlaneClient>,
    args: DestroyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let prompt = format!("Remove site {}? This is destructive.", args.site);
    if !util::confirm(&prompt, "destroy", global.yes)? {
        return Ok(());
    }

    reconciler.teardown(&args.site).await?;
    if let Some(ref path) = args.state {
        util::remove_state(path)?;
    }
    output::status(&format!("Site {} removed", args.site), global.quiet);
    Ok(())
}
