//! VLAN command handlers.

use tabled::Tabled;

use arubaos_api::{PortMode, SwitchClient, Vlan, VlanPort};

use crate::cli::{GlobalOpts, VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Type")]
    vlan_type: String,
    #[tabled(rename = "Mgmt")]
    management: String,
}

impl From<&Vlan> for VlanRow {
    fn from(v: &Vlan) -> Self {
        Self {
            id: v.vlan_id,
            name: v.name.clone(),
            status: output::opt(v.status.as_ref()),
            vlan_type: output::opt(v.vlan_type.as_ref()),
            management: match v.is_management_vlan {
                Some(true) => "yes".into(),
                _ => String::new(),
            },
        }
    }
}

#[derive(Tabled)]
pub(super) struct VlanPortRow {
    #[tabled(rename = "VLAN")]
    vlan: u16,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Mode")]
    mode: &'static str,
}

impl From<&VlanPort> for VlanPortRow {
    fn from(a: &VlanPort) -> Self {
        Self {
            vlan: a.vlan_id,
            port: a.port_id.clone(),
            mode: mode_label(&a.port_mode),
        }
    }
}

fn mode_label(mode: &PortMode) -> &'static str {
    match mode {
        PortMode::Untagged => "untagged",
        PortMode::TaggedStatic => "tagged",
        PortMode::Other(_) => "other",
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &mut SwitchClient,
    args: VlansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VlansCommand::List => {
            let vlans = client.vlans().await?;
            let out = output::render_list(
                &global.output,
                &vlans,
                |v| VlanRow::from(v),
                |v| v.vlan_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VlansCommand::Create { id, name } => {
            let outcome = client.create_vlan(id, &name).await?;
            util::report(
                outcome,
                &format!("VLAN {id} '{name}' created"),
                &format!("VLAN {id} already exists"),
                global,
            )
        }

        VlansCommand::Update { id, name } => {
            let outcome = client.update_vlan(id, &name).await?;
            util::report(outcome, &format!("VLAN {id} renamed to '{name}'"), "", global)
        }

        VlansCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete VLAN {id}? Ports carrying it lose that membership."),
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = client.delete_vlan(id).await?;
            util::report(
                outcome,
                &format!("VLAN {id} deleted"),
                &format!("VLAN {id} does not exist"),
                global,
            )
        }

        VlansCommand::Ports { id } => {
            let assocs = client.vlan_ports(id).await?;
            let out = output::render_list(
                &global.output,
                &assocs,
                |a| VlanPortRow::from(a),
                |a| a.port_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
