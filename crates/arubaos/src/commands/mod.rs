//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod arp;
pub mod config_cmd;
pub mod device;
pub mod mac;
pub mod poe;
pub mod ports;
pub mod system;
pub mod util;
pub mod vlans;

use arubaos_api::SwitchClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a switch-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &mut SwitchClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Vlans(args) => vlans::handle(client, args, global).await,
        Command::Ports(args) => ports::handle(client, args, global).await,
        Command::Poe(args) => poe::handle(client, args, global).await,
        Command::Mac(args) => mac::handle(client, args, global).await,
        Command::Arp(args) => arp::handle(client, args, global).await,
        Command::System(args) => system::handle(client, args, global).await,
        Command::Exec { command } => device::exec(client, &command.join(" "), global).await,
        Command::RunningConfig => device::running_config(client, global).await,
        Command::Ping { ip, wait } => device::ping(client, ip, wait, global).await,
        // Config and Completions never reach a switch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
