//! System command handlers: status, stack, banners, locator LED.

use tabled::Tabled;

use arubaos_api::{
    Banner, LedMode, StackMember, SwitchClient, SwitchStatus, SwitchType, SystemStatus,
};

use crate::cli::{GlobalOpts, LedArg, OutputFormat, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Serial")]
    serial: String,
}

impl From<&StackMember> for MemberRow {
    fn from(m: &StackMember) -> Self {
        Self {
            id: output::opt(m.member_id.as_ref()),
            status: output::opt(m.status.as_ref()),
            serial: output::opt(m.serial_number.as_ref()),
        }
    }
}

fn status_detail(s: &SystemStatus) -> String {
    output::detail_block(&[
        ("Name", s.name.clone()),
        ("Model", s.product_model.clone()),
        ("Serial", s.serial_number.clone()),
        ("Firmware", s.firmware_version.clone()),
        ("Hardware", s.hardware_revision.clone()),
    ])
}

fn switch_detail(s: &SwitchStatus) -> String {
    let kind = match s.switch_type {
        SwitchType::Standalone => "standalone",
        SwitchType::Stacked => "stacked",
    };
    output::detail_block(&[
        ("Type", Some(kind.to_owned())),
        ("Product", s.product_name.clone()),
        ("Number", s.product_number.clone()),
    ])
}

fn banner_detail(b: &Banner) -> String {
    format!("MOTD:\n{}\n\nExec:\n{}", b.motd.trim_end(), b.exec.trim_end())
}

impl From<LedArg> for LedMode {
    fn from(arg: LedArg) -> Self {
        match arg {
            LedArg::On => Self::On,
            LedArg::Off => Self::Off,
            LedArg::Blink => Self::Blink,
        }
    }
}

pub async fn handle(
    client: &mut SwitchClient,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        SystemCommand::Status => {
            let status = client.system_status().await?;
            output::render_single(&global.output, &status, status_detail, |s| {
                output::opt(s.name.as_ref())
            })?
        }

        SystemCommand::Switch => {
            let status = client.switch_status().await?;
            output::render_single(&global.output, &status, switch_detail, |s| {
                format!("{:?}", s.switch_type).to_lowercase()
            })?
        }

        SystemCommand::Members => {
            let members = client.stack_members().await?;
            if members.is_empty() && matches!(global.output, OutputFormat::Table) {
                "Switch is not stacked".to_owned()
            } else {
                output::render_list(&global.output, &members, |m| MemberRow::from(m), |m| {
                    output::opt(m.member_id.as_ref())
                })?
            }
        }

        SystemCommand::Info => {
            let info = client.global_info().await?;
            match global.output {
                OutputFormat::Yaml => serde_yaml::to_string(&info)?,
                OutputFormat::JsonCompact => serde_json::to_string(&info)?,
                _ => serde_json::to_string_pretty(&info)?,
            }
        }

        SystemCommand::Banner => {
            let banner = client.banner().await?;
            output::render_single(&global.output, &banner, banner_detail, |b| {
                b.motd.clone()
            })?
        }

        SystemCommand::SetBanner { motd, exec } => {
            let banner = client.set_banner(&motd, &exec).await?;
            if !global.quiet {
                eprintln!("Banners updated");
            }
            output::render_single(&global.output, &banner, banner_detail, |b| {
                b.motd.clone()
            })?
        }

        SystemCommand::Locate { mode, minutes } => {
            client.blink_locator_led(mode.into(), minutes).await?;
            if !global.quiet {
                eprintln!("Locator LED set to {mode:?} for {minutes} min");
            }
            String::new()
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
