//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod inventory;
pub mod reconcile;

use cfgsync_core::ProvisioningApi;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch<A: ProvisioningApi>(
    cmd: Command,
    api: &A,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Reconcile(args) => reconcile::handle(api, args, resolved, global).await,
        Command::Inventory => inventory::handle(api, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a controller session".into(),
        )),
    }
}
