// Port endpoints
//
// Port status is cached twice: the whole table from `GET /ports` and one
// record per port from `GET /ports/{id}`. Enabling or disabling a port
// replaces its per-port record with the switch's echo and drops the table.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use crate::cache::Mutation;
use crate::client::SwitchClient;
use crate::error::Error;
use crate::models::{Port, PortCollection};
use crate::outcome::Outcome;

/// How long a port stays down during a restart before being re-enabled.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

impl SwitchClient {
    /// Status of every port.
    ///
    /// `GET /ports`, cached until a port is enabled or disabled.
    pub async fn ports_status(&mut self) -> Result<Vec<Port>, Error> {
        if let Some(ports) = &self.cache.ports {
            return Ok(ports.clone());
        }
        debug!("fetching port table");
        let collection: PortCollection = self.get("/ports").await?;
        self.cache.ports = Some(collection.port_element.clone());
        Ok(collection.port_element)
    }

    /// One port's record.
    ///
    /// `GET /ports/{id}`, cached per port.
    pub async fn port(&mut self, port: &str) -> Result<Port, Error> {
        if let Some(cached) = self.cache.port.get(port) {
            return Ok(cached.clone());
        }
        let record: Port = self.get(&format!("/ports/{port}")).await?;
        self.cache.port.insert(port.to_owned(), record.clone());
        Ok(record)
    }

    pub async fn is_port_enabled(&mut self, port: &str) -> Result<bool, Error> {
        Ok(self.port(port).await?.is_port_enabled)
    }

    pub async fn is_port_up(&mut self, port: &str) -> Result<bool, Error> {
        Ok(self.port(port).await?.is_port_up)
    }

    async fn set_port_enabled(&mut self, port: &str, enabled: bool) -> Result<Outcome, Error> {
        info!(port, enabled, "changing port admin state");
        let body = json!({ "id": port, "is_port_enabled": enabled });
        let result = self.put::<Port, _>(&format!("/ports/{port}"), &body).await;
        self.cache.invalidate(Mutation::SetPortEnabled);
        let echoed = match result {
            Ok(echoed) => echoed,
            Err(e) => {
                self.cache.port.remove(port);
                return Err(e);
            }
        };

        let applied = echoed.is_port_enabled == enabled;
        self.cache.port.insert(port.to_owned(), echoed);

        if applied {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::not_applied(format!(
                "port {port} still reports is_port_enabled={}",
                !enabled
            )))
        }
    }

    /// `PUT /ports/{id}` with `is_port_enabled: true`.
    pub async fn enable_port(&mut self, port: &str) -> Result<Outcome, Error> {
        self.set_port_enabled(port, true).await
    }

    /// `PUT /ports/{id}` with `is_port_enabled: false`.
    pub async fn disable_port(&mut self, port: &str) -> Result<Outcome, Error> {
        self.set_port_enabled(port, false).await
    }

    /// Disable a port, wait [`SETTLE_DELAY`], then enable it again.
    ///
    /// If the port could not be disabled it is left alone and that outcome
    /// is returned. Be careful with uplinks: the session may not survive.
    pub async fn restart_port(&mut self, port: &str) -> Result<Outcome, Error> {
        let disabled = self.disable_port(port).await?;
        if !disabled.is_success() {
            return Ok(disabled);
        }
        tokio::time::sleep(SETTLE_DELAY).await;
        self.enable_port(port).await
    }
}
