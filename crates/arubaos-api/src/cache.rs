// Per-session response cache
//
// One slot per dataset, filled lazily by the getters and cleared by the
// mutations listed in `Mutation::invalidates`. Nothing expires on its own;
// the cache lives exactly as long as the client that owns it. The ARP table
// is never touched by a mutation and is only dropped by `clear_all`.

use std::collections::HashMap;

use tracing::trace;

use crate::models::{ArpEntry, PoePortStats, Port, Vlan, VlanPort};

/// Whole-table cache slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Vlans,
    VlansPorts,
    Ports,
    PoePorts,
}

/// Mutating operations, each paired with the slots it makes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mutation {
    CreateVlan,
    UpdateVlan,
    DeleteVlan,
    SetUntaggedVlan,
    SetTaggedVlans,
    SetPortEnabled,
    SetPoeEnabled,
}

impl Mutation {
    pub(crate) fn invalidates(self) -> &'static [Slot] {
        match self {
            Self::CreateVlan | Self::UpdateVlan => &[Slot::Vlans],
            Self::DeleteVlan => &[Slot::Vlans, Slot::VlansPorts],
            Self::SetUntaggedVlan | Self::SetTaggedVlans => &[Slot::VlansPorts],
            Self::SetPortEnabled => &[Slot::Ports],
            Self::SetPoeEnabled => &[Slot::PoePorts],
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ResponseCache {
    pub vlans: Option<Vec<Vlan>>,
    pub vlans_ports: Option<Vec<VlanPort>>,
    pub ports: Option<Vec<Port>>,
    pub poe_ports: Option<Vec<PoePortStats>>,
    pub arp_table: Option<Vec<ArpEntry>>,
    /// Per-port records keyed by port id.
    pub port: HashMap<String, Port>,
}

impl ResponseCache {
    pub(crate) fn invalidate(&mut self, mutation: Mutation) {
        for slot in mutation.invalidates() {
            trace!(?mutation, ?slot, "invalidating cache slot");
            self.clear(*slot);
        }
    }

    fn clear(&mut self, slot: Slot) {
        match slot {
            Slot::Vlans => self.vlans = None,
            Slot::VlansPorts => self.vlans_ports = None,
            Slot::Ports => self.ports = None,
            Slot::PoePorts => self.poe_ports = None,
        }
    }

    pub(crate) fn clear_all(&mut self) {
        *self = Self::default();
    }
}
