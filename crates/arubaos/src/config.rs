//! CLI configuration: thin wrapper around `arubaos_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` overrides (--host, --username, --insecure, --timeout).

use std::io::IsTerminal;

use arubaos_api::SwitchConfig;
use arubaos_config::ConfigError;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use arubaos_config::{Config, Profile, config_path, load_config, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `SwitchConfig` for a switch-bound command.
///
/// Flags override the selected profile. Without a profile, `--host` and
/// `--username` are enough; the password then comes from
/// `ARUBAOS_PASSWORD` or an interactive prompt.
pub fn build_switch_config(global: &GlobalOpts) -> Result<SwitchConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let base = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            if global.host.is_none() {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
            Profile::default()
        }
    };

    let mut profile = apply_overrides(base, global);
    tracing::debug!(profile = %profile_name, host = %profile.host, "resolved switch profile");

    match arubaos_config::profile_to_switch_config(&profile, &profile_name, &cfg.defaults) {
        Err(ConfigError::NoCredentials { .. })
            if profile.username.is_some() && std::io::stdin().is_terminal() =>
        {
            let prompt = format!("Password for {}: ", profile.host);
            profile.password = Some(rpassword::prompt_password(prompt)?);
            Ok(arubaos_config::profile_to_switch_config(
                &profile,
                &profile_name,
                &cfg.defaults,
            )?)
        }
        other => other.map_err(CliError::from),
    }
}

/// Layer the global flags over a profile.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn flags_override_profile_fields() {
        let cli = Cli::parse_from([
            "arubaos", "--host", "10.1.1.1", "-u", "ops", "-k", "--timeout", "900", "vlans", "list",
        ]);
        let profile = Profile {
            host: "core-sw".into(),
            username: Some("manager".into()),
            timeout: Some(5000),
            ..Profile::default()
        };

        let merged = apply_overrides(profile, &cli.global);
        assert_eq!(merged.host, "10.1.1.1");
        assert_eq!(merged.username.as_deref(), Some("ops"));
        assert_eq!(merged.insecure, Some(true));
        assert_eq!(merged.timeout, Some(900));
    }

    #[test]
    fn profile_kept_without_flags() {
        let cli = Cli::parse_from(["arubaos", "vlans", "list"]);
        let profile = Profile {
            host: "core-sw".into(),
            insecure: Some(false),
            ..Profile::default()
        };

        let merged = apply_overrides(profile, &cli.global);
        assert_eq!(merged.host, "core-sw");
        assert_eq!(merged.insecure, Some(false));
    }
}
