//! MAC table command handlers.

use tabled::Tabled;

use arubaos_api::{MacTableEntry, SwitchClient};

use crate::cli::{GlobalOpts, MacArgs, MacCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MacRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
}

impl From<&MacTableEntry> for MacRow {
    fn from(e: &MacTableEntry) -> Self {
        Self {
            mac: e.mac_address.clone(),
            port: output::opt(e.port_id.as_ref()),
            vlan: output::opt(e.vlan_id.as_ref()),
        }
    }
}

pub async fn handle(
    client: &mut SwitchClient,
    args: MacArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = match args.command {
        MacCommand::List => client.mac_table().await?,
        MacCommand::Port { port } => client.mac_table_port(&port).await?,
        MacCommand::Show { mac } => {
            let parsed = util::parse_mac(&mac)?;
            let entry = client
                .mac_address_info(&parsed)
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "MAC address".into(),
                    identifier: parsed.to_string(),
                    list_command: "mac list".into(),
                })?;
            let out = output::render_single(
                &global.output,
                &entry,
                |e| {
                    output::detail_block(&[
                        ("MAC", Some(e.mac_address.clone())),
                        ("Port", e.port_id.clone()),
                        ("VLAN", e.vlan_id.map(|v| v.to_string())),
                    ])
                },
                |e| e.mac_address.clone(),
            )?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
    };

    let out = output::render_list(&global.output, &entries, |e| MacRow::from(e), |e| {
        e.mac_address.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
