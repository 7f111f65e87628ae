// ARP table endpoints

use std::net::IpAddr;

use tracing::debug;

use crate::client::SwitchClient;
use crate::error::Error;
use crate::models::{ArpEntry, ArpTableCollection, MacAddress};

impl SwitchClient {
    /// The whole ARP table.
    ///
    /// `GET /arp-table`, cached until the cache is cleared explicitly or the
    /// session ends; no write in this client changes it.
    pub async fn arp_table(&mut self) -> Result<Vec<ArpEntry>, Error> {
        if let Some(entries) = &self.cache.arp_table {
            return Ok(entries.clone());
        }
        debug!("fetching ARP table");
        let collection: ArpTableCollection = self.get("/arp-table").await?;
        self.cache.arp_table = Some(collection.arp_table_entry_element.clone());
        Ok(collection.arp_table_entry_element)
    }

    /// `GET /arp-table/{ip}`
    pub async fn arp_by_ip(&self, ip: IpAddr) -> Result<Option<ArpEntry>, Error> {
        self.arp_lookup(&format!("/arp-table/{ip}")).await
    }

    /// `GET /arp-table/mac-address/{mac}`
    pub async fn arp_by_mac(&self, mac: &MacAddress) -> Result<Option<ArpEntry>, Error> {
        self.arp_lookup(&format!("/arp-table/mac-address/{mac}"))
            .await
    }

    /// Entries learned on one VLAN; empty when the VLAN has none or does
    /// not exist.
    ///
    /// `GET /arp-table/vlan/{id}`
    pub async fn arp_by_vlan(&self, vlan: u16) -> Result<Vec<ArpEntry>, Error> {
        match self
            .get::<ArpTableCollection>(&format!("/arp-table/vlan/{vlan}"))
            .await
        {
            Ok(collection) => Ok(collection.arp_table_entry_element),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn arp_lookup(&self, path: &str) -> Result<Option<ArpEntry>, Error> {
        match self.get(path).await {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.is_not_found() => {
                debug!(path, "no ARP entry");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
