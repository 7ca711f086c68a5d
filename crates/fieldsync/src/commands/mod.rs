//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod alerts;
pub mod config_cmd;
pub mod reports;
pub mod sensors;
pub mod stats;
pub mod util;
pub mod watch;

use fieldsync_core::{SyncConfig, SyncStore};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    store: &SyncStore,
    config: &SyncConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sensors => sensors::list(store, global).await,
        Command::Sensor { id } => sensors::detail(store, &id, global).await,
        Command::Realtime => sensors::realtime(store, global).await,
        Command::Alerts { severity } => alerts::list(store, severity, global).await,
        Command::Resolve { id } => alerts::resolve(store, &id, global).await,
        Command::Reports => reports::list(store, global).await,
        Command::Stats => stats::show(store, global).await,
        Command::Watch(args) => watch::run(store, config, &args, global).await,
        // Handled before a store exists
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
