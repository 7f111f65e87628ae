// Building the reqwest::Client for a switch
//
// TLS and timeout knobs from `SwitchConfig` are applied once, here. The
// session cookie is attached per request by the client, not via a jar.

use tracing::warn;

use crate::config::{SwitchConfig, TlsHostVerification};
use crate::error::Error;

const USER_AGENT: &str = concat!("arubaos-api/", env!("CARGO_PKG_VERSION"));

/// Build a `reqwest::Client` honouring the config's TLS verification
/// settings and default timeout.
pub fn build_client(config: &SwitchConfig) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(USER_AGENT);

    if !config.verify_tls_peer() {
        warn!(host = config.hostname(), "TLS certificate verification disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    match config.verify_tls_host() {
        TlsHostVerification::Strict => {}
        TlsHostVerification::Off => {
            warn!(host = config.hostname(), "TLS hostname verification disabled");
            builder = builder.danger_accept_invalid_hostnames(true);
        }
    }

    builder
        .build()
        .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
}
