//! Clap derive structures for the `arubaos` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// arubaos -- manage ArubaOS-Switch devices over their REST API
#[derive(Debug, Parser)]
#[command(
    name = "arubaos",
    version,
    about = "Manage ArubaOS-Switch devices from the command line",
    long_about = "Talks to the REST API of ArubaOS-Switch (ProCurve lineage) devices.\n\n\
        Every command opens one session, runs, and logs out again.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Switch profile to use
    #[arg(long, short = 'p', env = "ARUBAOS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Switch hostname or IPv4 address (overrides profile)
    #[arg(long, env = "ARUBAOS_HOST", global = true)]
    pub host: Option<String>,

    /// Login user (overrides profile)
    #[arg(long, short = 'u', env = "ARUBAOS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARUBAOS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ARUBAOS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in milliseconds (overrides profile)
    #[arg(long, env = "ARUBAOS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage VLANs
    #[command(alias = "vlan")]
    Vlans(VlansArgs),

    /// Port status, admin state and VLAN membership
    #[command(alias = "port")]
    Ports(PortsArgs),

    /// Power over Ethernet
    Poe(PoeArgs),

    /// MAC address table
    Mac(MacArgs),

    /// ARP table
    Arp(ArpArgs),

    /// System status, banners and the locator LED
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Run a CLI command on the switch and print its output
    Exec {
        /// Command line, e.g. `show vlans`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the running configuration
    RunningConfig,

    /// Ping a host from the switch
    Ping {
        /// Destination address
        ip: IpAddr,

        /// Seconds to wait for a reply
        #[arg(long, short = 'w', default_value = "1")]
        wait: u16,
    },

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VLANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// List VLANs
    #[command(alias = "ls")]
    List,

    /// Create a VLAN (no-op if it already exists)
    Create {
        /// VLAN ID (1-4094)
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        id: u16,

        /// VLAN name
        name: String,
    },

    /// Rename a VLAN
    Update {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        id: u16,

        /// New name
        name: String,
    },

    /// Delete a VLAN
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        id: u16,
    },

    /// List the ports carrying a VLAN
    Ports {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        id: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// List all ports
    #[command(alias = "ls")]
    List,

    /// Show one port and its VLAN membership
    Show {
        /// Port ID, e.g. `1/1` or `A3`
        port: String,
    },

    /// Administratively enable a port
    Enable { port: String },

    /// Administratively disable a port
    Disable { port: String },

    /// Disable a port, wait, and enable it again
    Restart { port: String },

    /// Set the untagged VLAN of a port
    Untagged {
        port: String,

        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,
    },

    /// Set the exact list of tagged VLANs on a port
    ///
    /// VLANs not listed are removed. Pass no VLANs to remove all tagged
    /// membership.
    Tagged {
        port: String,

        /// VLAN IDs, space or comma separated
        #[arg(value_delimiter = ',', num_args = 0..)]
        vlans: Vec<u16>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PoeArgs {
    #[command(subcommand)]
    pub command: PoeCommand,
}

#[derive(Debug, Subcommand)]
pub enum PoeCommand {
    /// PoE statistics for all ports
    #[command(alias = "ls")]
    List,

    /// PoE statistics for one port
    Show { port: String },

    /// Enable power delivery on a port
    Enable { port: String },

    /// Disable power delivery on a port
    Disable { port: String },

    /// Power-cycle the device on a port
    Restart { port: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAC / ARP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MacArgs {
    #[command(subcommand)]
    pub command: MacCommand,
}

#[derive(Debug, Subcommand)]
pub enum MacCommand {
    /// Every learned MAC address
    #[command(alias = "ls")]
    List,

    /// MAC addresses learned on one port
    Port { port: String },

    /// Where one MAC address was learned
    Show {
        /// Any common notation: aa:bb:cc:dd:ee:ff, aabb.ccdd.eeff, aabbcc-ddeeff
        mac: String,
    },
}

#[derive(Debug, Args)]
pub struct ArpArgs {
    #[command(subcommand)]
    pub command: ArpCommand,
}

#[derive(Debug, Subcommand)]
pub enum ArpCommand {
    /// The whole ARP table
    #[command(alias = "ls")]
    List,

    /// Look up an IP address
    Ip { ip: IpAddr },

    /// Look up a MAC address
    Mac { mac: String },

    /// Entries on one VLAN
    Vlan {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        id: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYSTEM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Name, serial number and firmware
    Status,

    /// Standalone or stacked, product information
    Switch,

    /// Stack members
    Members,

    /// Global system information as reported by the switch
    Info,

    /// Show the login banners
    Banner,

    /// Replace the login banners
    SetBanner {
        /// Message of the day, shown before login
        #[arg(long, default_value = "")]
        motd: String,

        /// Banner shown after login
        #[arg(long, default_value = "")]
        exec: String,
    },

    /// Switch the locator LED on, off or blinking
    Locate {
        #[arg(value_enum, default_value = "blink")]
        mode: LedArg,

        /// Duration in minutes (1-1440)
        #[arg(long, short = 'm', default_value = "30")]
        minutes: u16,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LedArg {
    On,
    Off,
    Blink,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration (passwords masked)
    Show,

    /// Create or replace a profile with guided setup
    Init,

    /// Store a profile's password in the system keyring
    SetPassword,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
