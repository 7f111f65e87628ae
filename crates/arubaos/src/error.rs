//! CLI error types with miette diagnostics.
//!
//! Maps `arubaos_api::Error` and `arubaos_config::ConfigError` into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use arubaos_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach switch {host}")]
    #[diagnostic(
        code(arubaos::connection_failed),
        help(
            "Check that the switch is reachable and the REST API is enabled\n\
             (`web-management ssl` and `rest-interface` on the switch)."
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(arubaos::tls_error),
        help("Switches usually ship self-signed certificates; use --insecure (-k) to accept them.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(arubaos::timeout),
        help("Increase the timeout with --timeout <ms> or check the switch's load.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(arubaos::auth_failed),
        help(
            "Verify the username and password for this switch.\n\
             Store a new password with: arubaos config set-password --profile <name>"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(arubaos::no_credentials),
        help(
            "Configure credentials with: arubaos config init\n\
             Or set ARUBAOS_USERNAME and ARUBAOS_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Switch responses ─────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(arubaos::not_found),
        help("Run: arubaos {list_command} to see what the switch knows about")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Not found on switch: {message}")]
    #[diagnostic(
        code(arubaos::missing),
        help("Check the identifier; the matching `list` command shows what the switch has.")
    )]
    Missing { message: String },

    #[error("Switch reported an error (HTTP {status}): {message}")]
    #[diagnostic(code(arubaos::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from switch: {message}")]
    #[diagnostic(
        code(arubaos::protocol),
        help(
            "The firmware may not support this API version.\n\
             Set `api_version` in the profile, e.g. api_version = \"v8\"."
        )
    )]
    Protocol { message: String },

    #[error("Change not applied: {reason}")]
    #[diagnostic(code(arubaos::not_applied))]
    NotApplied { reason: String },

    #[error("Rejected: {message}")]
    #[diagnostic(code(arubaos::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(arubaos::partial_change),
        help(
            "Steps completed before the failure were not rolled back.\n\
             Inspect the current state with: arubaos ports show <port>"
        )
    )]
    PartialChange { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(arubaos::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(arubaos::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: arubaos config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No switch configured")]
    #[diagnostic(
        code(arubaos::no_config),
        help(
            "Pass --host and --username, or create a profile with: arubaos config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(arubaos::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::Missing { .. } => exit_code::NOT_FOUND,
            Self::NotApplied { .. } | Self::Rejected { .. } => exit_code::CONFLICT,
            Self::PartialChange { .. } => exit_code::PARTIAL,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<arubaos_api::Error> for CliError {
    fn from(err: arubaos_api::Error) -> Self {
        use arubaos_api::Error as ApiError;

        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_not_found() {
            return Self::Missing {
                message: err.to_string(),
            };
        }

        match err {
            ApiError::InvalidConfig { message } => Self::Validation {
                field: "switch config".into(),
                reason: message,
            },
            ApiError::InvalidInput { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::Transport(e) => Self::ConnectionFailed {
                host: e
                    .url()
                    .and_then(|u| u.host_str())
                    .unwrap_or("(unknown)")
                    .to_owned(),
                source: Box::new(e),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(message) => Self::TlsError { message },
            ApiError::Protocol { message } => Self::Protocol { message },
            ApiError::Api { status, message } => Self::ApiError { status, message },
            ApiError::Precondition { message } => Self::Rejected { message },
            ApiError::Postcondition { message } => Self::PartialChange { message },
            mutation @ ApiError::Mutation { .. } => Self::PartialChange {
                message: format!("{mutation}: {}", mutation.root_cause()),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Switch(e) => e.into(),
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mutation_failures_are_partial_changes() {
        let err: CliError = arubaos_api::Error::Mutation {
            context: "cannot add tagged VLAN 8 on port 1".into(),
            source: Box::new(arubaos_api::Error::Api {
                status: 400,
                message: "VLAN 8 does not exist".into(),
            }),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::PARTIAL);
        assert!(err.to_string().contains("VLAN 8 does not exist"));
    }

    #[test]
    fn switch_404_maps_to_not_found_exit_code() {
        let err: CliError = arubaos_api::Error::Api {
            status: 404,
            message: "Port 99 not present".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().contains("Port 99"));
    }

    #[test]
    fn protocol_help_points_at_profile_key() {
        let err = CliError::Protocol {
            message: "unexpected response shape from /vlans".into(),
        };
        let help = err.help().unwrap().to_string();
        assert!(help.contains("api_version ="));
        assert!(!help.contains("--api-version"));
    }

    #[test]
    fn config_credentials_error_maps_to_auth_exit_code() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "core".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
