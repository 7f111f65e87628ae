//! Shared configuration for the arubaos tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `arubaos_api::SwitchConfig`. The CLI layers its
//! global flags on top of what is resolved here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use arubaos_api::{Scheme, SwitchConfig};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "arubaos";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error(transparent)]
    Switch(#[from] arubaos_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named switch profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            api_version: default_api_version(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    5000
}
fn default_api_version() -> String {
    "v7".into()
}

/// A named switch profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Switch hostname or IPv4 address.
    pub host: String,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Skip TLS certificate verification.
    pub insecure: Option<bool>,

    /// Check the certificate's hostname. Defaults to on.
    pub verify_hostname: Option<bool>,

    /// Override timeout (milliseconds).
    pub timeout: Option<u64>,

    /// REST API version segment, e.g. "v7".
    pub api_version: Option<String>,

    /// "https" (default) or "http".
    pub scheme: Option<String>,

    pub port: Option<u16>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "arubaos", "arubaos").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("arubaos");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Missing files are not an error; nested
/// keys are reachable from the environment with a double underscore,
/// e.g. `ARUBAOS_DEFAULTS__TIMEOUT=10000`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARUBAOS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

/// Resolve the login user for a profile: profile field, then
/// `ARUBAOS_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("ARUBAOS_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve a password: the profile's `password_env`, `ARUBAOS_PASSWORD`,
/// the system keyring, then the plaintext field.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env vars
    let from_env = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| std::env::var("ARUBAOS_PASSWORD").ok());
    if let Some(pw) = from_env {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    let from_keyring = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .and_then(|entry| entry.get_password());
    if let Ok(pw) = from_keyring {
        debug!(profile = profile_name, "password found in keyring");
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

pub fn parse_scheme(value: &str) -> Result<Scheme, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "https" => Ok(Scheme::Https),
        "http" => Ok(Scheme::Http),
        other => Err(ConfigError::Validation {
            field: "scheme".into(),
            reason: format!("expected 'https' or 'http', got '{other}'"),
        }),
    }
}

/// Build a `SwitchConfig` from a profile and the file-level defaults.
pub fn profile_to_switch_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SwitchConfig, ConfigError> {
    if profile.host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("profile '{profile_name}' has no host"),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let insecure = profile.insecure.unwrap_or(defaults.insecure);
    let timeout = Duration::from_millis(profile.timeout.unwrap_or(defaults.timeout));
    let api_version = profile
        .api_version
        .clone()
        .unwrap_or_else(|| defaults.api_version.clone());

    let mut config = SwitchConfig::new(profile.host.clone(), username, password)?
        .with_timeout(timeout)
        .with_tls_peer_verification(!insecure)
        .with_tls_host_verification(profile.verify_hostname.unwrap_or(true))
        .with_api_version(api_version);

    if let Some(scheme) = profile.scheme.as_deref() {
        config = config.with_scheme(parse_scheme(scheme)?);
    }
    if let Some(port) = profile.port {
        config = config.with_port(port);
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "core"

[defaults]
timeout = 8000

[profiles.core]
host = "core-sw.example.net"
username = "manager"
password = "plain"
scheme = "http"
port = 8080

[profiles.edge]
host = "10.0.0.2"
insecure = true
timeout = 2000
"#;

    // Loading reads the process environment, so every test that loads runs
    // inside a `Jail`, which serializes them.

    #[test]
    fn loads_profiles_and_defaults_from_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.default_profile.as_deref(), Some("core"));
            assert_eq!(config.defaults.timeout, 8000);
            assert_eq!(config.defaults.output, "table");
            assert_eq!(config.profiles.len(), 2);
            assert_eq!(config.profiles["edge"].insecure, Some(true));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.default_profile.as_deref(), Some("default"));
            assert!(config.profiles.is_empty());
            assert_eq!(config.defaults.timeout, 5000);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("ARUBAOS_DEFAULTS__TIMEOUT", "12000");
            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.defaults.timeout, 12000);
            Ok(())
        });
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "lab".into(),
            Profile {
                host: "lab-sw".into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        figment::Jail::expect_with(|_jail| {
            let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
            assert_eq!(loaded.profiles["lab"].host, "lab-sw");
            assert_eq!(loaded.profiles["lab"].username.as_deref(), Some("admin"));
            Ok(())
        });
    }

    #[test]
    fn profile_translates_to_switch_config() {
        let profile = Profile {
            host: "core-sw.example.net".into(),
            username: Some("manager".into()),
            password: Some("plain".into()),
            insecure: Some(true),
            scheme: Some("HTTP".into()),
            port: Some(8080),
            ..Profile::default()
        };
        let defaults = Defaults {
            timeout: 8000,
            ..Defaults::default()
        };

        let config =
            profile_to_switch_config(&profile, "arubaos-test-no-keyring", &defaults).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(8000));
        assert!(!config.verify_tls_peer());
        assert_eq!(config.base_url(), "http://core-sw.example.net:8080/rest/v7");
        assert_eq!(config.password().expose_secret(), "plain");
    }

    #[test]
    fn password_env_takes_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ARUBAOS_TEST_SWITCH_PW", "from-env");
            let profile = Profile {
                host: "sw".into(),
                password: Some("plain".into()),
                password_env: Some("ARUBAOS_TEST_SWITCH_PW".into()),
                ..Profile::default()
            };
            let pw = resolve_password(&profile, "arubaos-test-no-keyring")
                .map_err(|e| e.to_string())?;
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn invalid_host_and_scheme_are_rejected() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            host: "bad host".into(),
            username: Some("u".into()),
            password: Some("p".into()),
            ..Profile::default()
        };
        let err = profile_to_switch_config(&profile, "arubaos-test-no-keyring", &defaults)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Switch(_)));

        profile.host = "sw".into();
        profile.scheme = Some("ftp".into());
        let err = profile_to_switch_config(&profile, "arubaos-test-no-keyring", &defaults)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
