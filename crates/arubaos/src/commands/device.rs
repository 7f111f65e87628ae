//! CLI passthrough and ping.

use std::net::IpAddr;

use arubaos_api::{PingResult, SwitchClient};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Run a CLI command; its output goes to stdout untouched so it can be
/// redirected.
pub async fn exec(
    client: &SwitchClient,
    command: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match client.cli(command).await? {
        Some(text) => {
            output::print_output(text.trim_end(), global.quiet);
            Ok(())
        }
        None => Err(CliError::Rejected {
            message: format!("the switch did not complete `{command}`"),
        }),
    }
}

pub async fn running_config(client: &SwitchClient, global: &GlobalOpts) -> Result<(), CliError> {
    exec(client, "show running-config", global).await
}

fn ping_summary(ip: IpAddr, result: &PingResult) -> String {
    match (result.is_reachable(), result.rtt_in_milliseconds) {
        (true, Some(rtt)) => format!("{ip} is alive, round trip {rtt} ms"),
        (true, None) => format!("{ip} is alive"),
        (false, _) => format!("{ip} did not answer ({})", result.result),
    }
}

pub async fn ping(
    client: &SwitchClient,
    ip: IpAddr,
    wait: u16,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = client.ping(ip, wait).await?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => ping_summary(ip, &result),
        _ => output::render_single(
            &global.output,
            &result,
            |_| String::new(),
            |_| String::new(),
        )?,
    };
    output::print_output(&out, global.quiet);

    if result.is_reachable() {
        Ok(())
    } else {
        Err(CliError::NotFound {
            resource_type: "Host".into(),
            identifier: ip.to_string(),
            list_command: "arp list".into(),
        })
    }
}
