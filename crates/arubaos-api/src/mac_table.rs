// MAC address table endpoints

use tracing::debug;

use crate::client::SwitchClient;
use crate::error::Error;
use crate::models::{MacAddress, MacTableCollection, MacTableEntry};

impl SwitchClient {
    /// Every learned MAC address.
    ///
    /// `GET /mac-table`
    pub async fn mac_table(&self) -> Result<Vec<MacTableEntry>, Error> {
        debug!("fetching MAC table");
        let collection: MacTableCollection = self.get("/mac-table").await?;
        Ok(collection.mac_table_entry_element)
    }

    /// MAC addresses learned on one port.
    ///
    /// `GET /ports/{id}/mac-table`
    pub async fn mac_table_port(&self, port: &str) -> Result<Vec<MacTableEntry>, Error> {
        let collection: MacTableCollection =
            self.get(&format!("/ports/{port}/mac-table")).await?;
        Ok(collection.mac_table_entry_element)
    }

    /// Where a MAC address was learned, or `None` if the switch does not
    /// know it.
    ///
    /// `GET /mac-table/{mac}`
    pub async fn mac_address_info(
        &self,
        mac: &MacAddress,
    ) -> Result<Option<MacTableEntry>, Error> {
        match self.get(&format!("/mac-table/{mac}")).await {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.is_not_found() => {
                debug!(%mac, "MAC address not in table");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
