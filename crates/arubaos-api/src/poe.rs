// Power over Ethernet endpoints

use serde_json::json;
use tracing::{debug, info};

use crate::cache::Mutation;
use crate::client::SwitchClient;
use crate::error::Error;
use crate::models::{PoePortConfig, PoePortStats, PoeStatsCollection};
use crate::outcome::Outcome;
use crate::ports::SETTLE_DELAY;

impl SwitchClient {
    /// PoE statistics of every port.
    ///
    /// `GET /poe/ports/stats`, cached until PoE is toggled on a port.
    pub async fn ports_poe_status(&mut self) -> Result<Vec<PoePortStats>, Error> {
        if let Some(stats) = &self.cache.poe_ports {
            return Ok(stats.clone());
        }
        debug!("fetching PoE statistics");
        let collection: PoeStatsCollection = self.get("/poe/ports/stats").await?;
        self.cache.poe_ports = Some(collection.port_poe_stats.clone());
        Ok(collection.port_poe_stats)
    }

    /// PoE statistics of one port. Not cached.
    ///
    /// `GET /ports/{id}/poe/stats`
    pub async fn port_poe_status(&self, port: &str) -> Result<PoePortStats, Error> {
        self.get(&format!("/ports/{port}/poe/stats")).await
    }

    async fn set_poe_enabled(&mut self, port: &str, enabled: bool) -> Result<Outcome, Error> {
        info!(port, enabled, "changing PoE state");
        let body = json!({ "port_id": port, "is_poe_enabled": enabled });
        let result = self
            .put::<PoePortConfig, _>(&format!("/ports/{port}/poe"), &body)
            .await;
        self.cache.invalidate(Mutation::SetPoeEnabled);

        if result?.is_poe_enabled == enabled {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::not_applied(format!(
                "port {port} still reports is_poe_enabled={}",
                !enabled
            )))
        }
    }

    /// `PUT /ports/{id}/poe` with `is_poe_enabled: true`.
    pub async fn enable_poe_port(&mut self, port: &str) -> Result<Outcome, Error> {
        self.set_poe_enabled(port, true).await
    }

    /// `PUT /ports/{id}/poe` with `is_poe_enabled: false`.
    pub async fn disable_poe_port(&mut self, port: &str) -> Result<Outcome, Error> {
        self.set_poe_enabled(port, false).await
    }

    /// Power-cycle the device on a port: disable PoE, wait
    /// [`SETTLE_DELAY`], enable PoE.
    pub async fn restart_poe_port(&mut self, port: &str) -> Result<Outcome, Error> {
        let disabled = self.disable_poe_port(port).await?;
        if !disabled.is_success() {
            return Ok(disabled);
        }
        tokio::time::sleep(SETTLE_DELAY).await;
        self.enable_poe_port(port).await
    }
}
