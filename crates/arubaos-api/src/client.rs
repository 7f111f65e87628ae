// ArubaOS-Switch session client
//
// Owns the HTTP client, the session cookie and the response cache. Every
// endpoint module (vlans, ports, poe, ...) is implemented as inherent
// methods in its own file; this module only deals with transport
// mechanics: URL construction, the session cookie, per-request timeouts
// and decoding the JSON reply.

use std::ops::AsyncFnOnce;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::cache::ResponseCache;
use crate::config::SwitchConfig;
use crate::error::Error;
use crate::transport;

pub(crate) const LOGIN_SESSIONS: &str = "/login-sessions";

/// Decoded body of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    Payload(serde_json::Value),
    /// The switch answered with an empty body (typical for DELETE).
    Empty,
}

/// Result of decoding a body once, before the HTTP status is considered.
#[derive(Debug, PartialEq)]
enum Envelope {
    Payload(serde_json::Value),
    Empty,
    /// JSON carrying the switch's in-band `message` field.
    Fault(String),
}

fn decode_body(body: &str) -> Result<Envelope, Error> {
    if body.trim().is_empty() {
        return Ok(Envelope::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::protocol(format!("response is not valid JSON: {e}")))?;

    let fault = match value.get("message") {
        None | Some(serde_json::Value::Null | serde_json::Value::Bool(false)) => None,
        Some(serde_json::Value::String(message)) if message.is_empty() => None,
        Some(serde_json::Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(match fault {
        Some(message) => Envelope::Fault(message),
        None => Envelope::Payload(value),
    })
}

/// Authenticated session with one ArubaOS switch.
///
/// Obtained with [`connect`](Self::connect), which logs in immediately, and
/// released with [`close`](Self::close), which logs out. [`scoped`](Self::scoped)
/// pairs the two around a closure.
///
/// Methods that can change the response cache take `&mut self`: a client is
/// one session with one cache and is not meant to be shared between tasks.
#[derive(Debug)]
pub struct SwitchClient {
    http: reqwest::Client,
    config: SwitchConfig,
    base_url: Url,
    /// Value of the `Cookie` header, as returned by the login call.
    token: Option<SecretString>,
    pub(crate) cache: ResponseCache,
}

impl SwitchClient {
    /// Build the HTTP client from `config` and log in.
    pub async fn connect(config: SwitchConfig) -> Result<Self, Error> {
        let http = transport::build_client(&config)?;
        Self::connect_with_client(config, http).await
    }

    /// Log in using a pre-built `reqwest::Client`.
    ///
    /// The client's own TLS settings are used as-is; the config only
    /// provides the endpoint, credentials and timeouts.
    pub async fn connect_with_client(
        config: SwitchConfig,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url())?;
        let mut client = Self {
            http,
            config,
            base_url,
            token: None,
            cache: ResponseCache::default(),
        };
        client.login().await?;
        Ok(client)
    }

    /// Connect, run `f`, then log out whatever `f` returned.
    ///
    /// Logout failures are logged and swallowed; the closure's result is
    /// returned unchanged.
    pub async fn scoped<T, F>(config: SwitchConfig, f: F) -> Result<T, Error>
    where
        F: AsyncFnOnce(&mut SwitchClient) -> Result<T, Error>,
    {
        let mut client = Self::connect(config).await?;
        let result = f(&mut client).await;
        client.close().await;
        result
    }

    /// Log out and release the session. Never fails.
    pub async fn close(mut self) {
        if let Err(e) = self.logout().await {
            warn!(error = %e, host = self.config.hostname(), "logout failed");
        }
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// `true` while a session cookie is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop every cached response so the next read goes to the switch.
    pub fn invalidate_cache(&mut self) {
        debug!("clearing response cache");
        self.cache.clear_all();
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(SecretString::from(token));
    }

    pub(crate) fn clear_token(&mut self) {
        self.token = None;
    }

    // ── Request primitive ────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Issue one request and decode the reply.
    ///
    /// The session cookie is attached when one is held. An in-band
    /// `message` field is reported as [`Error::Api`] whatever the HTTP
    /// status; an empty body is [`Reply::Empty`].
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<Reply, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(%method, path, "sending request");

        let mut builder = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout.unwrap_or_else(|| self.config.timeout()));

        if let Some(token) = &self.token {
            builder = builder.header(COOKIE, token.expose_secret());
        }

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| Error::protocol(format!("failed to encode request body: {e}")))?;
            builder = builder.body(bytes);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        trace!(%status, bytes = text.len(), "response received");

        match decode_body(&text) {
            Ok(Envelope::Fault(message)) => Err(Error::Api {
                status: status.as_u16(),
                message,
            }),
            Ok(_) | Err(_) if !status.is_success() => Err(Error::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}: {}", preview(&text)),
            }),
            Ok(Envelope::Payload(value)) => Ok(Reply::Payload(value)),
            Ok(Envelope::Empty) => Ok(Reply::Empty),
            Err(e) => Err(e),
        }
    }

    /// `GET` a payload and deserialize it.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let reply = self.send::<()>(Method::GET, path, None, None).await?;
        parse_reply(reply, path)
    }

    /// `POST` a JSON body and deserialize the echoed payload.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let reply = self.send(Method::POST, path, Some(body), None).await?;
        parse_reply(reply, path)
    }

    /// `PUT` a JSON body and deserialize the echoed payload.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let reply = self.send(Method::PUT, path, Some(body), None).await?;
        parse_reply(reply, path)
    }

    /// `DELETE` a resource. The raw reply is returned because callers
    /// differ on whether a body is acceptable.
    pub(crate) async fn delete(&self, path: &str) -> Result<Reply, Error> {
        self.send::<()>(Method::DELETE, path, None, None).await
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

pub(crate) fn parse_reply<T: DeserializeOwned>(reply: Reply, path: &str) -> Result<T, Error> {
    match reply {
        Reply::Payload(value) => serde_json::from_value(value)
            .map_err(|e| Error::protocol(format!("unexpected response shape from {path}: {e}"))),
        Reply::Empty => Err(Error::protocol(format!("empty response from {path}"))),
    }
}

impl Drop for SwitchClient {
    /// Best-effort logout for a client that was never [`close`](Self::close)d.
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                host = self.config.hostname(),
                "client dropped without close() outside a runtime; session left open"
            );
            return;
        };

        debug!(host = self.config.hostname(), "client dropped without close(); logging out");
        let request = self
            .http
            .delete(self.url(LOGIN_SESSIONS))
            .header(CONTENT_TYPE, "application/json")
            .header(COOKIE, token.expose_secret())
            .timeout(self.config.timeout());
        runtime.spawn(async move {
            if let Err(e) = request.send().await {
                warn!(error = %e, "background logout failed");
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_and_blank_bodies_decode_to_empty() {
        assert_eq!(decode_body("").unwrap(), Envelope::Empty);
        assert_eq!(decode_body(" \n").unwrap(), Envelope::Empty);
    }

    #[test]
    fn non_json_is_a_protocol_error() {
        let err = decode_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[test]
    fn message_field_is_a_fault() {
        assert_eq!(
            decode_body(r#"{"message":"VLAN 4095 is reserved"}"#).unwrap(),
            Envelope::Fault("VLAN 4095 is reserved".into())
        );
    }

    #[test]
    fn empty_message_is_not_a_fault() {
        let body = r#"{"message":"","vlan_id":10}"#;
        assert_eq!(
            decode_body(body).unwrap(),
            Envelope::Payload(json!({ "message": "", "vlan_id": 10 }))
        );
        assert!(matches!(
            decode_body(r#"{"message":null}"#).unwrap(),
            Envelope::Payload(_)
        ));
    }

    #[test]
    fn parse_reply_rejects_empty() {
        let err = parse_reply::<serde_json::Value>(Reply::Empty, "/vlans").unwrap_err();
        assert!(err.to_string().contains("/vlans"));
    }
}
