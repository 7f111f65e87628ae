//! Port command handlers.

use serde::Serialize;
use tabled::Tabled;

use arubaos_api::{Port, PortMode, SETTLE_DELAY, SwitchClient, VlanPort};

use crate::cli::{GlobalOpts, OutputFormat, PortsArgs, PortsCommand};
use crate::error::CliError;
use crate::output;

use super::util;
use super::vlans::VlanPortRow;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Trunk")]
    trunk: String,
}

/// `ports show` in structured formats.
#[derive(Serialize)]
struct PortView<'a> {
    port: &'a Port,
    vlans: &'a [VlanPort],
}

fn port_row(p: &Port, color: bool) -> PortRow {
    PortRow {
        id: p.id.clone(),
        name: output::opt(p.name.as_ref()),
        admin: output::state(p.is_port_enabled, "enabled", "disabled", color),
        link: output::state(p.is_port_up, "up", "down", color),
        mode: output::opt(p.config_mode.as_ref()),
        trunk: output::opt(p.trunk_group.as_ref()),
    }
}

fn detail(p: &Port, membership: &[VlanPort]) -> String {
    let untagged = membership
        .iter()
        .find(|a| a.port_mode == PortMode::Untagged)
        .map(|a| a.vlan_id.to_string());
    let tagged: Vec<String> = membership
        .iter()
        .filter(|a| a.port_mode == PortMode::TaggedStatic)
        .map(|a| a.vlan_id.to_string())
        .collect();

    output::detail_block(&[
        ("Port", Some(p.id.clone())),
        ("Name", p.name.clone()),
        ("Enabled", Some(yes_no(p.is_port_enabled))),
        ("Link up", Some(yes_no(p.is_port_up))),
        ("Config mode", p.config_mode.clone()),
        ("Trunk group", p.trunk_group.clone()),
        ("Untagged VLAN", untagged),
        (
            "Tagged VLANs",
            (!tagged.is_empty()).then(|| tagged.join(", ")),
        ),
    ])
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_owned()
}

pub async fn handle(
    client: &mut SwitchClient,
    args: PortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PortsCommand::List => {
            let ports = client.ports_status().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &ports,
                |p| port_row(p, color),
                |p| p.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Show { port } => {
            let info = client.port(&port).await?;
            let membership = client.vlans_port(&port).await?;
            let out = match global.output {
                OutputFormat::Table => {
                    let mut text = detail(&info, &membership);
                    if !membership.is_empty() {
                        let rows: Vec<VlanPortRow> =
                            membership.iter().map(VlanPortRow::from).collect();
                        text.push_str("\n\n");
                        text.push_str(
                            &tabled::Table::new(rows)
                                .with(tabled::settings::Style::rounded())
                                .to_string(),
                        );
                    }
                    text
                }
                _ => output::render_single(
                    &global.output,
                    &PortView {
                        port: &info,
                        vlans: &membership,
                    },
                    |_| String::new(),
                    |v| v.port.id.clone(),
                )?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Enable { port } => {
            let outcome = client.enable_port(&port).await?;
            util::report(
                outcome,
                &format!("Port {port} enabled"),
                &format!("Port {port} already enabled"),
                global,
            )
        }

        PortsCommand::Disable { port } => {
            if !util::confirm(&format!("Disable port {port}?"), global.yes)? {
                return Ok(());
            }
            let outcome = client.disable_port(&port).await?;
            util::report(
                outcome,
                &format!("Port {port} disabled"),
                &format!("Port {port} already disabled"),
                global,
            )
        }

        PortsCommand::Restart { port } => {
            if !util::confirm(
                &format!(
                    "Restart port {port}? Its link drops for about {}s.",
                    SETTLE_DELAY.as_secs()
                ),
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = client.restart_port(&port).await?;
            util::report(outcome, &format!("Port {port} restarted"), "", global)
        }

        PortsCommand::Untagged { port, vlan } => {
            let outcome = client.set_untagged_vlan_port(vlan, &port).await?;
            util::report(
                outcome,
                &format!("Port {port} untagged on VLAN {vlan}"),
                &format!("Port {port} already untagged on VLAN {vlan}"),
                global,
            )
        }

        PortsCommand::Tagged { port, vlans } => {
            if vlans.is_empty()
                && !util::confirm(
                    &format!("Remove every tagged VLAN from port {port}?"),
                    global.yes,
                )?
            {
                return Ok(());
            }
            let list = if vlans.is_empty() {
                "(none)".to_owned()
            } else {
                vlans
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let outcome = client.set_tagged_vlans_port(&vlans, &port).await?;
            util::report(
                outcome,
                &format!("Port {port} tagged VLANs set to {list}"),
                &format!("Port {port} already carries tagged VLANs {list}"),
                global,
            )
        }
    }
}
