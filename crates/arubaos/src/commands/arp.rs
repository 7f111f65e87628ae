//! ARP table command handlers.

use tabled::Tabled;

use arubaos_api::{ArpEntry, SwitchClient};

use crate::cli::{ArpArgs, ArpCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ArpRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Type")]
    entry_type: String,
}

impl From<&ArpEntry> for ArpRow {
    fn from(e: &ArpEntry) -> Self {
        Self {
            ip: e.ip_address.octets.clone(),
            mac: e.mac_address.clone(),
            port: output::opt(e.port_id.as_ref()),
            vlan: output::opt(e.vlan_id.as_ref()),
            entry_type: output::opt(e.entry_type.as_ref()),
        }
    }
}

fn not_found(identifier: String) -> CliError {
    CliError::NotFound {
        resource_type: "ARP entry".into(),
        identifier,
        list_command: "arp list".into(),
    }
}

pub async fn handle(
    client: &mut SwitchClient,
    args: ArpArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = match args.command {
        ArpCommand::List => client.arp_table().await?,
        ArpCommand::Vlan { id } => client.arp_by_vlan(id).await?,
        ArpCommand::Ip { ip } => {
            let entry = client
                .arp_by_ip(ip)
                .await?
                .ok_or_else(|| not_found(ip.to_string()))?;
            vec![entry]
        }
        ArpCommand::Mac { mac } => {
            let parsed = util::parse_mac(&mac)?;
            let entry = client
                .arp_by_mac(&parsed)
                .await?
                .ok_or_else(|| not_found(parsed.to_string()))?;
            vec![entry]
        }
    };

    let out = output::render_list(&global.output, &entries, |e| ArpRow::from(e), |e| {
        e.ip_address.octets.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
