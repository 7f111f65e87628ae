// arubaos-api: Async Rust client for the ArubaOS-Switch REST API
//
// One `SwitchClient` is one authenticated session. Endpoint groups live in
// their own modules as inherent methods on the client; composite operations
// (VLAN/port membership, port restarts) report soft results as `Outcome`.

mod arp;
mod auth;
mod cache;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
mod mac_table;
pub mod models;
pub mod outcome;
mod poe;
pub mod ports;
mod system;
pub mod transport;
mod vlans;

pub use client::SwitchClient;
pub use config::{Scheme, SwitchConfig, TlsHostVerification};
pub use device::MAX_LOCATOR_MINUTES;
pub use error::Error;
pub use models::{
    ArpEntry, Banner, CliStatus, IpAddress, IpVersion, LedMode, MacAddress, MacTableEntry,
    PingResult, PoeDetectionStatus, PoePortConfig, PoePortStats, Port, PortMode, StackMember,
    SwitchStatus, SwitchType, SystemStatus, Vlan, VlanPort,
};
pub use outcome::Outcome;
pub use ports::SETTLE_DELAY;
