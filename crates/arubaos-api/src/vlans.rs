// VLAN and VLAN/port association endpoints
//
// `/vlans` and `/vlans-ports` reads are cached; every write clears the
// slots it affects before returning. The tagged/untagged setters read the
// current associations, apply the difference one request at a time and, for
// tagged VLANs, re-read the port to confirm the switch converged. Nothing is
// rolled back when a step fails midway.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::{debug, info};

use crate::cache::Mutation;
use crate::client::{Reply, SwitchClient};
use crate::error::Error;
use crate::models::{PortMode, Vlan, VlanCollection, VlanPort, VlanPortCollection, VlanPortRequest};
use crate::outcome::Outcome;

fn join_ids(ids: &[u16]) -> String {
    ids.iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl SwitchClient {
    // ── VLANs ────────────────────────────────────────────────────────

    /// All VLANs on the switch.
    ///
    /// `GET /vlans`, cached until a VLAN is created, updated or deleted.
    pub async fn vlans(&mut self) -> Result<Vec<Vlan>, Error> {
        if let Some(vlans) = &self.cache.vlans {
            return Ok(vlans.clone());
        }
        debug!("fetching VLANs");
        let collection: VlanCollection = self.get("/vlans").await?;
        self.cache.vlans = Some(collection.vlan_element.clone());
        Ok(collection.vlan_element)
    }

    async fn vlan_exists(&mut self, vlan: u16) -> Result<bool, Error> {
        Ok(self.vlans().await?.iter().any(|v| v.vlan_id == vlan))
    }

    /// Create a VLAN unless it already exists.
    ///
    /// `POST /vlans`. The echoed id and name must match the request.
    pub async fn create_vlan(&mut self, vlan: u16, name: &str) -> Result<Outcome, Error> {
        if self.vlan_exists(vlan).await? {
            debug!(vlan, "VLAN already present");
            return Ok(Outcome::AlreadySatisfied);
        }

        info!(vlan, name, "creating VLAN");
        let body = json!({ "vlan_id": vlan, "name": name });
        let result = self.post::<Vlan, _>("/vlans", &body).await;
        self.cache.invalidate(Mutation::CreateVlan);
        let created = result?;

        if created.vlan_id == vlan && created.name == name {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::not_applied(format!(
                "switch echoed VLAN {} '{}' instead of {vlan} '{name}'",
                created.vlan_id, created.name
            )))
        }
    }

    /// Rename an existing VLAN. A VLAN that does not exist is reported as
    /// not applied and no request is sent.
    ///
    /// `POST /vlans/{id}`
    pub async fn update_vlan(&mut self, vlan: u16, name: &str) -> Result<Outcome, Error> {
        if !self.vlan_exists(vlan).await? {
            return Ok(Outcome::not_applied(format!("VLAN {vlan} does not exist")));
        }

        info!(vlan, name, "updating VLAN");
        let result = self
            .post::<serde_json::Value, _>(&format!("/vlans/{vlan}"), &json!({ "name": name }))
            .await;
        self.cache.invalidate(Mutation::UpdateVlan);
        result?;
        Ok(Outcome::Applied)
    }

    /// Delete a VLAN. A VLAN that does not exist counts as already deleted
    /// and no request is sent.
    ///
    /// `DELETE /vlans/{id}`
    pub async fn delete_vlan(&mut self, vlan: u16) -> Result<Outcome, Error> {
        if !self.vlan_exists(vlan).await? {
            debug!(vlan, "VLAN already absent");
            return Ok(Outcome::AlreadySatisfied);
        }

        info!(vlan, "deleting VLAN");
        let result = self.delete(&format!("/vlans/{vlan}")).await;
        self.cache.invalidate(Mutation::DeleteVlan);
        result?;
        Ok(Outcome::Applied)
    }

    // ── VLAN/port associations ───────────────────────────────────────

    /// Every VLAN/port association on the switch.
    ///
    /// `GET /vlans-ports`, cached until an association changes.
    pub async fn vlans_ports(&mut self) -> Result<Vec<VlanPort>, Error> {
        if let Some(assocs) = &self.cache.vlans_ports {
            return Ok(assocs.clone());
        }
        debug!("fetching VLAN/port associations");
        let collection: VlanPortCollection = self.get("/vlans-ports").await?;
        self.cache.vlans_ports = Some(collection.vlan_port_element.clone());
        Ok(collection.vlan_port_element)
    }

    /// Associations of one port, tagged and untagged. Empty when the port
    /// carries no VLAN or does not exist.
    pub async fn vlans_port(&mut self, port: &str) -> Result<Vec<VlanPort>, Error> {
        let assocs = self.vlans_ports().await?;
        Ok(assocs.into_iter().filter(|a| a.port_id == port).collect())
    }

    /// The untagged association of a port, if any.
    pub async fn untagged_vlan_port(&mut self, port: &str) -> Result<Option<VlanPort>, Error> {
        let assocs = self.vlans_port(port).await?;
        Ok(assocs
            .into_iter()
            .find(|a| a.port_mode == PortMode::Untagged))
    }

    /// The tagged associations of a port.
    pub async fn tagged_vlans_port(&mut self, port: &str) -> Result<Vec<VlanPort>, Error> {
        let assocs = self.vlans_port(port).await?;
        Ok(assocs
            .into_iter()
            .filter(|a| a.port_mode == PortMode::TaggedStatic)
            .collect())
    }

    /// Every port carrying `vlan`, tagged or untagged.
    pub async fn vlan_ports(&mut self, vlan: u16) -> Result<Vec<VlanPort>, Error> {
        let assocs = self.vlans_ports().await?;
        Ok(assocs.into_iter().filter(|a| a.vlan_id == vlan).collect())
    }

    async fn post_association(
        &self,
        vlan: u16,
        port: &str,
        port_mode: PortMode,
    ) -> Result<VlanPort, Error> {
        let body = VlanPortRequest {
            vlan_id: vlan,
            port_id: port,
            port_mode,
        };
        self.post("/vlans-ports", &body).await
    }

    /// Remove one association; the switch answers a successful removal with
    /// an empty body, anything else is treated as a failure.
    async fn delete_association(&self, vlan: u16, port: &str) -> Result<(), Error> {
        match self.delete(&format!("/vlans-ports/{vlan}-{port}")).await? {
            Reply::Empty => Ok(()),
            Reply::Payload(body) => Err(Error::protocol(format!(
                "unexpected body when removing VLAN {vlan} from port {port}: {body}"
            ))),
        }
    }

    /// Make `vlan` the untagged VLAN of `port`.
    ///
    /// If `vlan` is currently tagged on the port, that association is
    /// removed first; failing to remove it is an error because the port
    /// would otherwise be left half-configured.
    pub async fn set_untagged_vlan_port(
        &mut self,
        vlan: u16,
        port: &str,
    ) -> Result<Outcome, Error> {
        let current = self.untagged_vlan_port(port).await?;
        if current.is_some_and(|assoc| assoc.vlan_id == vlan) {
            return Ok(Outcome::AlreadySatisfied);
        }

        let tagged = self.tagged_vlans_port(port).await?;
        self.cache.invalidate(Mutation::SetUntaggedVlan);

        if tagged.iter().any(|a| a.vlan_id == vlan) {
            info!(vlan, port, "removing tagged association before setting it untagged");
            self.delete_association(vlan, port)
                .await
                .map_err(|source| Error::Mutation {
                    context: format!(
                        "VLAN {vlan} is tagged on port {port} and could not be removed \
                         before setting it untagged"
                    ),
                    source: Box::new(source),
                })?;
        }

        info!(vlan, port, "setting untagged VLAN");
        let assoc = self.post_association(vlan, port, PortMode::Untagged).await?;

        if assoc.vlan_id == vlan && assoc.port_id == port {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::not_applied(format!(
                "switch echoed VLAN {} on port {} instead of VLAN {vlan} on port {port}",
                assoc.vlan_id, assoc.port_id
            )))
        }
    }

    /// Make `vlans` exactly the set of tagged VLANs on `port`.
    ///
    /// Missing VLANs are added and extra ones removed, one request each.
    /// Requesting the port's untagged VLAN is rejected before anything is
    /// sent. Any failed step aborts with the already-applied steps left in
    /// place. After the changes the port is re-read and must carry exactly
    /// the requested set.
    pub async fn set_tagged_vlans_port(
        &mut self,
        vlans: &[u16],
        port: &str,
    ) -> Result<Outcome, Error> {
        let wanted: BTreeSet<u16> = vlans.iter().copied().collect();
        let wanted_ids: Vec<u16> = wanted.iter().copied().collect();

        let mut current = Vec::new();
        for assoc in self.vlans_port(port).await? {
            match assoc.port_mode {
                PortMode::TaggedStatic => current.push(assoc.vlan_id),
                PortMode::Untagged if wanted.contains(&assoc.vlan_id) => {
                    return Err(Error::Precondition {
                        message: format!(
                            "cannot tag VLAN {} on port {port}: it is the port's untagged VLAN",
                            assoc.vlan_id
                        ),
                    });
                }
                PortMode::Untagged | PortMode::Other(_) => {}
            }
        }

        // Additions keep the caller's order.
        let mut to_add: Vec<u16> = Vec::new();
        for vlan in vlans {
            if !current.contains(vlan) && !to_add.contains(vlan) {
                to_add.push(*vlan);
            }
        }
        let to_remove: Vec<u16> = current
            .iter()
            .copied()
            .filter(|vlan| !wanted.contains(vlan))
            .collect();

        if to_add.is_empty() && to_remove.is_empty() {
            return Ok(Outcome::AlreadySatisfied);
        }

        let step_context = |action: &str, vlan: u16| {
            format!(
                "cannot {action} tagged VLAN {vlan} on port {port} \
                 (initial: [{}], wanted: [{}])",
                join_ids(&current),
                join_ids(&wanted_ids)
            )
        };

        self.cache.invalidate(Mutation::SetTaggedVlans);

        for &vlan in &to_add {
            info!(vlan, port, "adding tagged VLAN");
            let step = self
                .post_association(vlan, port, PortMode::TaggedStatic)
                .await
                .and_then(|assoc| verify_tagged_echo(&assoc, vlan, port));
            step.map_err(|source| Error::Mutation {
                context: step_context("add", vlan),
                source: Box::new(source),
            })?;
        }

        for &vlan in &to_remove {
            info!(vlan, port, "removing tagged VLAN");
            self.delete_association(vlan, port)
                .await
                .map_err(|source| Error::Mutation {
                    context: step_context("remove", vlan),
                    source: Box::new(source),
                })?;
        }

        let mut actual: Vec<u16> = self
            .tagged_vlans_port(port)
            .await?
            .iter()
            .map(|a| a.vlan_id)
            .collect();
        actual.sort_unstable();

        if actual == wanted_ids {
            Ok(Outcome::Applied)
        } else {
            Err(Error::Postcondition {
                message: format!(
                    "tagged VLANs on port {port} are [{}] after applying [{}] without errors",
                    join_ids(&actual),
                    join_ids(&wanted_ids)
                ),
            })
        }
    }
}

fn verify_tagged_echo(assoc: &VlanPort, vlan: u16, port: &str) -> Result<(), Error> {
    if assoc.vlan_id == vlan && assoc.port_id == port && assoc.port_mode == PortMode::TaggedStatic {
        Ok(())
    } else {
        Err(Error::protocol(format!(
            "switch echoed VLAN {} on port {} as {}",
            assoc.vlan_id, assoc.port_id, assoc.port_mode
        )))
    }
}
