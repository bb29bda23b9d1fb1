//! Command dispatch: bridges CLI args -> reconciler calls -> output formatting.

pub mod apply;
pub mod config_cmd;
pub mod destroy;
pub mod plan;
pub mod refresh;
pub mod slots;
pub mod util;
pub mod validate;

use edgesite_api::ControlPlaneClient;
use edgesite_core::Reconciler;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs the control-plane.
pub async fn dispatch(
    cmd: Command,
    reconciler: &Reconciler<ControlPlaneClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Plan(args) => plan::handle(reconciler, args, global).await,
        Command::Apply(args) => apply::handle(reconciler, args, global).await,
        Command::Refresh(args) => refresh::handle(reconciler, args, global).await,
        Command::Slots(args) => slots::handle(reconciler, args, global).await,
        Command::Destroy(args) => destroy::handle(reconciler, args, global).await,
        // Offline commands are handled before a client is built.
        Command::Validate(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
