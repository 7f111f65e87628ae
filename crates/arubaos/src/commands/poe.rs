//! PoE command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use arubaos_api::{PoeDetectionStatus, PoePortStats, SwitchClient};

use crate::cli::{GlobalOpts, PoeArgs, PoeCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PoeRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Detection")]
    detection: String,
    #[tabled(rename = "Voltage (V)")]
    voltage: String,
    #[tabled(rename = "Power (W)")]
    power: String,
}

fn detection_label(status: Option<&PoeDetectionStatus>) -> &'static str {
    match status {
        Some(PoeDetectionStatus::Disabled) => "disabled",
        Some(PoeDetectionStatus::Searching) => "searching",
        Some(PoeDetectionStatus::Delivering) => "delivering",
        Some(PoeDetectionStatus::Fault) => "fault",
        Some(PoeDetectionStatus::Test) => "test",
        Some(PoeDetectionStatus::OtherFault) => "other fault",
        None => "",
    }
}

fn poe_row(s: &PoePortStats, color: bool) -> PoeRow {
    let status = s.poe_detection_status.as_ref();
    let label = detection_label(status);
    let detection = match status {
        Some(st) if color && st.is_faulty() => label.red().to_string(),
        Some(PoeDetectionStatus::Delivering) if color => label.green().to_string(),
        _ => label.to_owned(),
    };
    PoeRow {
        port: s.port_id.clone(),
        detection,
        voltage: s
            .port_voltage_in_volts
            .map(|v| format!("{v:.1}"))
            .unwrap_or_default(),
        power: s
            .power_in_watts
            .map(|w| format!("{w:.1}"))
            .unwrap_or_default(),
    }
}

fn detail(s: &PoePortStats) -> String {
    output::detail_block(&[
        ("Port", Some(s.port_id.clone())),
        (
            "Detection",
            s.poe_detection_status
                .as_ref()
                .map(|st| detection_label(Some(st)).to_owned()),
        ),
        ("Voltage", s.port_voltage_in_volts.map(|v| format!("{v:.1} V"))),
        ("Power", s.power_in_watts.map(|w| format!("{w:.1} W"))),
    ])
}

pub async fn handle(
    client: &mut SwitchClient,
    args: PoeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PoeCommand::List => {
            let stats = client.ports_poe_status().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &stats,
                |s| poe_row(s, color),
                |s| s.port_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Show { port } => {
            let stats = client.port_poe_status(&port).await?;
            let out = output::render_single(&global.output, &stats, detail, |s| {
                s.port_id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Enable { port } => {
            let outcome = client.enable_poe_port(&port).await?;
            util::report(outcome, &format!("PoE enabled on port {port}"), "", global)
        }

        PoeCommand::Disable { port } => {
            if !util::confirm(
                &format!("Cut power to the device on port {port}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = client.disable_poe_port(&port).await?;
            util::report(outcome, &format!("PoE disabled on port {port}"), "", global)
        }

        PoeCommand::Restart { port } => {
            if !util::confirm(
                &format!("Power-cycle the device on port {port}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = client.restart_poe_port(&port).await?;
            util::report(outcome, &format!("Port {port} power-cycled"), "", global)
        }
    }
}
