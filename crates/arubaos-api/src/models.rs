// ArubaOS-Switch REST response types
//
// Only the fields the client makes decisions on are modelled explicitly;
// everything else lands in a flattened `extra` map so callers still see the
// full record. Fields use `#[serde(default)]` liberally because the field set
// varies across firmware releases and API versions.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

type Extra = serde_json::Map<String, serde_json::Value>;

// ── Collection envelope ──────────────────────────────────────────────

/// Counts attached to every collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionResult {
    #[serde(default)]
    pub total_elements_count: u32,
    #[serde(default)]
    pub filtered_elements_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VlanCollection {
    #[serde(default)]
    pub vlan_element: Vec<Vlan>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VlanPortCollection {
    #[serde(default)]
    pub vlan_port_element: Vec<VlanPort>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortCollection {
    #[serde(default)]
    pub port_element: Vec<Port>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MacTableCollection {
    #[serde(default)]
    pub mac_table_entry_element: Vec<MacTableEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArpTableCollection {
    #[serde(default)]
    pub arp_table_entry_element: Vec<ArpEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PoeStatsCollection {
    #[serde(default)]
    pub port_poe_stats: Vec<PoePortStats>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StackMemberCollection {
    #[serde(default)]
    pub stack_member_element: Vec<StackMember>,
}

// ── Session ──────────────────────────────────────────────────────────

/// Body of a successful `POST /login-sessions`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginSession {
    #[serde(default)]
    pub cookie: Option<String>,
}

// ── VLANs ────────────────────────────────────────────────────────────

/// VLAN from `GET /vlans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    pub vlan_id: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub vlan_type: Option<String>,
    #[serde(default)]
    pub is_management_vlan: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// How a VLAN is carried on a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortMode {
    #[serde(rename = "POM_UNTAGGED")]
    Untagged,
    #[serde(rename = "POM_TAGGED_STATIC")]
    TaggedStatic,
    /// Modes the client never acts on (forbidden, dynamic, ...).
    #[serde(untagged)]
    Other(String),
}

impl PortMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Untagged => "POM_UNTAGGED",
            Self::TaggedStatic => "POM_TAGGED_STATIC",
            Self::Other(mode) => mode,
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One VLAN/port association from `GET /vlans-ports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlanPort {
    pub vlan_id: u16,
    pub port_id: String,
    pub port_mode: PortMode,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize)]
pub(crate) struct VlanPortRequest<'a> {
    pub vlan_id: u16,
    pub port_id: &'a str,
    pub port_mode: PortMode,
}

// ── Ports ────────────────────────────────────────────────────────────

/// Physical or trunk port from `GET /ports` and `GET /ports/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_port_enabled: bool,
    #[serde(default)]
    pub is_port_up: bool,
    #[serde(default)]
    pub config_mode: Option<String>,
    #[serde(default)]
    pub trunk_group: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── MAC table ────────────────────────────────────────────────────────

/// Entry from `GET /mac-table`, `GET /mac-table/{mac}` and
/// `GET /ports/{id}/mac-table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacTableEntry {
    pub mac_address: String,
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<u16>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A MAC address in the switch's native `aabbcc-ddeeff` notation.
///
/// Parses the common colon, hyphen, dotted and bare-hex spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidInput {
            field: "mac address",
            reason: format!("'{s}' is not a MAC address"),
        };

        let grouping_ok = match s.len() {
            // aabbccddeeff
            12 => true,
            // aabbcc-ddeeff
            13 => s.as_bytes()[6] == b'-',
            // aabb.ccdd.eeff
            14 => s.split('.').map(str::len).eq([4, 4, 4]),
            // aa:bb:cc:dd:ee:ff / aa-bb-cc-dd-ee-ff
            17 => {
                let sep = s.as_bytes()[2];
                (sep == b':' || sep == b'-')
                    && s.split(char::from(sep)).map(str::len).eq([2; 6])
            }
            _ => false,
        };
        if !grouping_ok {
            return Err(invalid());
        }

        let hex: Vec<u8> = s
            .bytes()
            .filter(|b| !matches!(b, b':' | b'-' | b'.'))
            .collect();
        if hex.len() != 12 || !hex.iter().all(u8::is_ascii_hexdigit) {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(hex.chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}{b:02x}{c:02x}-{d:02x}{e:02x}{g:02x}")
    }
}

// ── ARP ──────────────────────────────────────────────────────────────

/// IP address version token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    #[serde(rename = "IAV_IP_V4")]
    V4,
    #[serde(rename = "IAV_IP_V6")]
    V6,
}

/// The switch's `{version, octets}` address object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    pub version: IpVersion,
    pub octets: String,
}

impl From<IpAddr> for IpAddress {
    fn from(ip: IpAddr) -> Self {
        let version = match ip {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        };
        Self {
            version,
            octets: ip.to_string(),
        }
    }
}

/// Entry from `GET /arp-table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpEntry {
    pub ip_address: IpAddress,
    pub mac_address: String,
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<u16>,
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── PoE ──────────────────────────────────────────────────────────────

/// Power delivery state of a PoE port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoeDetectionStatus {
    #[serde(rename = "PPDS_DISABLE")]
    Disabled,
    #[serde(rename = "PPDS_SEARCHING")]
    Searching,
    #[serde(rename = "PPDS_DELIVERING")]
    Delivering,
    #[serde(rename = "PPDS_FAULT")]
    Fault,
    #[serde(rename = "PPDS_TEST")]
    Test,
    #[serde(rename = "PPDS_OTHER_FAULT")]
    OtherFault,
}

impl PoeDetectionStatus {
    /// `PPDS_FAULT`, `PPDS_TEST` and `PPDS_OTHER_FAULT`.
    pub fn is_faulty(&self) -> bool {
        matches!(self, Self::Fault | Self::Test | Self::OtherFault)
    }
}

/// PoE statistics from `GET /poe/ports/stats` or `GET /ports/{id}/poe/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoePortStats {
    pub port_id: String,
    #[serde(default)]
    pub poe_detection_status: Option<PoeDetectionStatus>,
    #[serde(default)]
    pub port_voltage_in_volts: Option<f64>,
    #[serde(default)]
    pub power_in_watts: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// PoE configuration echoed by `PUT /ports/{id}/poe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoePortConfig {
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub is_poe_enabled: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── System ───────────────────────────────────────────────────────────

/// `GET /system/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub hardware_revision: Option<String>,
    #[serde(default)]
    pub product_model: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Whether the switch runs standalone or as part of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchType {
    #[serde(rename = "ST_STANDALONE")]
    Standalone,
    #[serde(rename = "ST_STACKED")]
    Stacked,
}

/// `GET /system/status/switch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatus {
    pub switch_type: SwitchType,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_number: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Member of a stack from `GET /system/status/members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackMember {
    #[serde(default)]
    pub member_id: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Login banners, decoded from the wire's base64 fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub motd: String,
    pub exec: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct BannerWire {
    #[serde(default)]
    pub motd_base64_encoded: String,
    #[serde(default)]
    pub exec_base64_encoded: String,
}

// ── Locator LED ──────────────────────────────────────────────────────

/// Locator LED state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedMode {
    #[serde(rename = "LS_OFF")]
    Off,
    #[serde(rename = "LS_ON")]
    On,
    #[serde(rename = "LS_BLINK")]
    Blink,
}

/// When a locator or ping request takes effect. The API only knows "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedTiming {
    #[default]
    #[serde(rename = "LBT_NOW")]
    Now,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocatorRequest {
    pub led_blink_status: LedMode,
    pub when: LedTiming,
    pub duration_in_minutes: u16,
}

// ── CLI ──────────────────────────────────────────────────────────────

/// Completion status of a command sent to `POST /cli`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CliStatus {
    #[serde(rename = "CCS_SUCCESS")]
    Success,
    #[serde(untagged)]
    Failed(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct CliResponse {
    pub status: CliStatus,
    #[serde(default)]
    pub result_base64_encoded: String,
}

// ── Ping ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct PingDestination {
    pub ip_address: IpAddress,
}

#[derive(Debug, Serialize)]
pub(crate) struct PingRequest {
    pub destination: PingDestination,
    pub timeout_in_seconds: u16,
}

/// Result of `POST /ping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    /// `PR_OK` when the destination answered.
    pub result: String,
    #[serde(default)]
    pub rtt_in_milliseconds: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PingResult {
    pub fn is_reachable(&self) -> bool {
        self.result == "PR_OK"
    }
}
