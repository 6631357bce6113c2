//! Command dispatch: bridges CLI args -> dashboard calls -> output formatting.

pub mod admin;
pub mod combined;
pub mod config_cmd;
pub mod insights;
pub mod sites;
pub mod trends;
pub mod util;
pub mod watch;

use aihref_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites => sites::list(dashboard, global),
        Command::Site(args) => sites::show(dashboard, args, global).await,
        Command::Combined(args) => combined::handle(dashboard, args, global).await,
        Command::Trends(args) => trends::handle(dashboard, args, global).await,
        Command::Aggregate => admin::aggregate(dashboard, global).await,
        Command::Health => admin::health(dashboard, global).await,
        Command::Insights(args) => insights::handle(dashboard, args, global).await,
        Command::Watch(args) => watch::handle(dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
