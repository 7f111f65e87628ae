// Shared wiremock fixtures for the integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arubaos_api::{Scheme, SwitchClient, SwitchConfig};

pub const COOKIE: &str = "sessionId=abc123";

/// Endpoint path under the default `/rest/v7` root.
pub fn api(suffix: &str) -> String {
    format!("/rest/v7{suffix}")
}

pub fn config_for(server: &MockServer) -> SwitchConfig {
    let addr = server.address();
    let password: SecretString = "secret".to_string().into();
    SwitchConfig::new(addr.ip().to_string(), "manager", password)
        .unwrap()
        .with_scheme(Scheme::Http)
        .with_port(addr.port())
}

/// Login returns [`COOKIE`], logout answers 204.
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uri": "/login-sessions",
            "cookie": COOKIE
        })))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

pub async fn setup() -> (MockServer, SwitchClient) {
    let server = MockServer::start().await;
    mount_session(&server).await;
    let client = SwitchClient::connect(config_for(&server)).await.unwrap();
    (server, client)
}

/// `(METHOD, path)` of every request the server saw, login included.
pub async fn request_log(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|req| (req.method.to_string(), req.url.path().to_owned()))
        .collect()
}

pub fn vlan_port(vlan: u16, port: &str, mode: &str) -> serde_json::Value {
    json!({ "vlan_id": vlan, "port_id": port, "port_mode": mode })
}

pub fn vlans_ports_body(elements: &[serde_json::Value]) -> serde_json::Value {
    json!({
        "collection_result": {
            "total_elements_count": elements.len(),
            "filtered_elements_count": elements.len()
        },
        "vlan_port_element": elements
    })
}
