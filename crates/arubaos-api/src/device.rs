// Device actions: CLI passthrough, locator LED, ping
//
// `POST /cli` runs a command on the switch and can take a while for large
// outputs such as `show running-config`, so it gets extra time on top of
// the configured timeout.

use std::net::IpAddr;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::{SwitchClient, parse_reply};
use crate::error::Error;
use crate::models::{
    CliResponse, CliStatus, IpAddress, LedMode, LedTiming, LocatorRequest, PingDestination,
    PingRequest, PingResult,
};

const CLI_EXTRA_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest locator blink the switch accepts, in minutes.
pub const MAX_LOCATOR_MINUTES: u16 = 1440;

impl SwitchClient {
    /// Run a CLI command on the switch.
    ///
    /// Returns the command's output, or `None` when the switch reports
    /// anything other than `CCS_SUCCESS`.
    ///
    /// `POST /cli`
    pub async fn cli(&self, command: &str) -> Result<Option<String>, Error> {
        debug!(command, "running CLI command");
        let timeout = self.config().timeout() + CLI_EXTRA_TIMEOUT;
        let body = json!({ "cmd": command });
        let reply = self
            .send(Method::POST, "/cli", Some(&body), Some(timeout))
            .await?;
        let response: CliResponse = parse_reply(reply, "/cli")?;

        match response.status {
            CliStatus::Success => {
                let bytes = STANDARD
                    .decode(response.result_base64_encoded.trim())
                    .map_err(|e| Error::protocol(format!("CLI output is not valid base64: {e}")))?;
                let output = String::from_utf8(bytes)
                    .map_err(|e| Error::protocol(format!("CLI output is not UTF-8: {e}")))?;
                Ok(Some(output))
            }
            CliStatus::Failed(status) => {
                warn!(command, status, "CLI command did not succeed");
                Ok(None)
            }
        }
    }

    /// `show running-config` through [`cli`](Self::cli).
    pub async fn running_config(&self) -> Result<Option<String>, Error> {
        self.cli("show running-config").await
    }

    /// Turn the locator LED on, off or blinking for `duration_minutes`
    /// (1 to [`MAX_LOCATOR_MINUTES`]).
    ///
    /// `POST /locator-led-blink`
    pub async fn blink_locator_led(
        &self,
        mode: LedMode,
        duration_minutes: u16,
    ) -> Result<(), Error> {
        if !(1..=MAX_LOCATOR_MINUTES).contains(&duration_minutes) {
            return Err(Error::InvalidInput {
                field: "duration_minutes",
                reason: format!(
                    "{duration_minutes} is outside 1..={MAX_LOCATOR_MINUTES}"
                ),
            });
        }

        info!(?mode, duration_minutes, "setting locator LED");
        let body = LocatorRequest {
            led_blink_status: mode,
            when: LedTiming::Now,
            duration_in_minutes: duration_minutes,
        };
        // The switch answers with an empty body or an echo; neither matters.
        self.send(Method::POST, "/locator-led-blink", Some(&body), None)
            .await?;
        Ok(())
    }

    /// Ping `ip` from the switch.
    ///
    /// `POST /ping`
    pub async fn ping(&self, ip: IpAddr, timeout_secs: u16) -> Result<PingResult, Error> {
        debug!(%ip, timeout_secs, "pinging from switch");
        let body = PingRequest {
            destination: PingDestination {
                ip_address: IpAddress::from(ip),
            },
            timeout_in_seconds: timeout_secs,
        };
        let request_timeout =
            self.config().timeout() + Duration::from_secs(u64::from(timeout_secs));
        let reply = self
            .send(Method::POST, "/ping", Some(&body), Some(request_timeout))
            .await?;
        parse_reply(reply, "/ping")
    }
}
