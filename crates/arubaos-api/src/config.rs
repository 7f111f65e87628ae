// Switch connection configuration
//
// Describes *how* to reach one switch: host, credentials, and transport
// tuning. Pure data plus construction-time validation; it never touches
// disk or the environment. `arubaos-config` builds one from a profile.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
const DEFAULT_API_VERSION: &str = "v7";

/// Hostname verification strength applied during the TLS handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsHostVerification {
    /// Certificate must be valid *and* match the hostname.
    #[default]
    Strict,
    /// No hostname check.
    Off,
}

impl From<bool> for TlsHostVerification {
    fn from(verify: bool) -> Self {
        if verify { Self::Strict } else { Self::Off }
    }
}

/// URL scheme used to reach the REST API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Https,
    /// Plain HTTP, for switches with only `web-management plaintext`.
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for connecting to a single switch.
///
/// Setters consume and return `self` so a config reads as one chain:
///
/// ```
/// # use arubaos_api::SwitchConfig;
/// # use std::time::Duration;
/// let config = SwitchConfig::new("switch01.example.net", "api", "secret".to_string().into())?
///     .with_timeout(Duration::from_secs(10))
///     .with_tls_host_verification(false);
/// # Ok::<(), arubaos_api::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    hostname: String,
    username: String,
    password: SecretString,
    timeout: Duration,
    verify_tls_peer: bool,
    verify_tls_host: TlsHostVerification,
    api_version: String,
    scheme: Scheme,
    port: Option<u16>,
}

impl SwitchConfig {
    /// Build a config, rejecting hostnames that are not valid domain names
    /// (IPv4 dotted quads are accepted).
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let hostname = hostname.into();
        validate_hostname(&hostname)?;
        Ok(Self {
            hostname,
            username: username.into(),
            password,
            timeout: DEFAULT_TIMEOUT,
            verify_tls_peer: true,
            verify_tls_host: TlsHostVerification::default(),
            api_version: DEFAULT_API_VERSION.into(),
            scheme: Scheme::default(),
            port: None,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Default per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_tls_peer(&self) -> bool {
        self.verify_tls_peer
    }

    pub fn verify_tls_host(&self) -> TlsHostVerification {
        self.verify_tls_host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls_peer_verification(mut self, verify: bool) -> Self {
        self.verify_tls_peer = verify;
        self
    }

    /// `true` maps to [`TlsHostVerification::Strict`], `false` to
    /// [`TlsHostVerification::Off`].
    pub fn with_tls_host_verification(mut self, verify: bool) -> Self {
        self.verify_tls_host = TlsHostVerification::from(verify);
        self
    }

    /// API version segment, e.g. `"v7"` or `"v8"`.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Root of every endpoint: `{scheme}://{host}[:port]/rest/{version}`.
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!(
                "{}://{}:{port}/rest/{}",
                self.scheme, self.hostname, self.api_version
            ),
            None => format!("{}://{}/rest/{}", self.scheme, self.hostname, self.api_version),
        }
    }
}

/// Domain-name syntax check: labels of ASCII alphanumerics and hyphens,
/// 1–63 characters each, no leading or trailing hyphen, 253 characters
/// overall. A single trailing dot is allowed.
fn validate_hostname(hostname: &str) -> Result<(), Error> {
    let invalid = |reason: &str| Error::InvalidConfig {
        message: format!("invalid hostname '{hostname}': {reason}"),
    };

    let name = hostname.strip_suffix('.').unwrap_or(hostname);
    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.len() > 253 {
        return Err(invalid("longer than 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("empty label"));
        }
        if label.len() > 63 {
            return Err(invalid("label longer than 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label starts or ends with '-'"));
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(invalid("unexpected character"));
        }
    }
    Ok(())
}
