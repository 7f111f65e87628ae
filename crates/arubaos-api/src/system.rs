// System status and banner endpoints

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info};

use crate::client::SwitchClient;
use crate::error::Error;
use crate::models::{
    Banner, BannerWire, StackMember, StackMemberCollection, SwitchStatus, SystemStatus,
};

fn decode_field(field: &str, encoded: &str) -> Result<String, Error> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::protocol(format!("{field} is not valid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::protocol(format!("{field} is not UTF-8: {e}")))
}

impl SwitchClient {
    /// `GET /system/status`
    pub async fn system_status(&self) -> Result<SystemStatus, Error> {
        self.get("/system/status").await
    }

    /// `GET /system/status/switch`
    pub async fn switch_status(&self) -> Result<SwitchStatus, Error> {
        self.get("/system/status/switch").await
    }

    /// Free-form global information; the field set differs enough between
    /// models that it is returned untyped.
    ///
    /// `GET /system/status/global_info`
    pub async fn global_info(&self) -> Result<serde_json::Value, Error> {
        self.get("/system/status/global_info").await
    }

    /// Members of the stack. Standalone switches report an empty list or
    /// no such resource, both of which yield an empty `Vec`.
    ///
    /// `GET /system/status/members`
    pub async fn stack_members(&self) -> Result<Vec<StackMember>, Error> {
        match self
            .get::<StackMemberCollection>("/system/status/members")
            .await
        {
            Ok(collection) => Ok(collection.stack_member_element),
            Err(e) if e.is_not_found() => {
                debug!("switch reports no stack members");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Login banners, base64-decoded.
    ///
    /// `GET /banner`
    pub async fn banner(&self) -> Result<Banner, Error> {
        let wire: BannerWire = self.get("/banner").await?;
        Ok(Banner {
            motd: decode_field("motd_base64_encoded", &wire.motd_base64_encoded)?,
            exec: decode_field("exec_base64_encoded", &wire.exec_base64_encoded)?,
        })
    }

    /// Replace both login banners and return what the switch now holds.
    ///
    /// `PUT /banner`
    pub async fn set_banner(&self, motd: &str, exec: &str) -> Result<Banner, Error> {
        info!("updating login banners");
        let body = BannerWire {
            motd_base64_encoded: STANDARD.encode(motd),
            exec_base64_encoded: STANDARD.encode(exec),
        };
        let wire: BannerWire = self.put("/banner", &body).await?;
        Ok(Banner {
            motd: decode_field("motd_base64_encoded", &wire.motd_base64_encoded)?,
            exec: decode_field("exec_base64_encoded", &wire.exec_base64_encoded)?,
        })
    }
}
