#![allow(clippy::unwrap_used)]
// Session lifecycle and response decoding against a wiremock switch.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arubaos_api::{Error, SwitchClient, SwitchConfig};
use common::{COOKIE, api, config_for, mount_session, request_log, setup};

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_then_cookie_on_every_request() {
    let (server, mut client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("/vlans")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vlan_element": [{ "vlan_id": 1, "name": "DEFAULT_VLAN" }]
        })))
        .mount(&server)
        .await;

    assert!(client.is_authenticated());
    let vlans = client.vlans().await.unwrap();
    assert_eq!(vlans.len(), 1);
    client.close().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let login = &requests[0];
    assert_eq!(login.url.path(), "/rest/v7/login-sessions");
    assert!(login.headers.get("cookie").is_none());
    assert_eq!(
        login.body_json::<serde_json::Value>().unwrap(),
        json!({ "userName": "manager", "password": "secret" })
    );

    for later in &requests[1..] {
        assert_eq!(later.headers.get("cookie").unwrap(), COOKIE);
    }
    assert_eq!(requests[2].method.as_str(), "DELETE");
}

#[tokio::test]
async fn test_login_without_cookie_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "uri": "/login-sessions" })))
        .mount(&server)
        .await;

    let result = SwitchClient::connect(config_for(&server)).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_rejected_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authentication failed."
        })))
        .mount(&server)
        .await;

    let err = SwitchClient::connect(config_for(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert!(err.to_string().contains("Authentication failed."));
}

#[tokio::test]
async fn test_scoped_logs_out_when_closure_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "cookie": COOKIE })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result: Result<(), Error> =
        SwitchClient::scoped(config_for(&server), async |_client: &mut SwitchClient| {
            Err(Error::Precondition {
                message: "boom".into(),
            })
        })
        .await;

    assert!(matches!(result, Err(Error::Precondition { .. })));
    server.verify().await;
}

#[tokio::test]
async fn test_scoped_swallows_logout_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "cookie": COOKIE })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/login-sessions")))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let value = SwitchClient::scoped(config_for(&server), async |client: &mut SwitchClient| {
        Ok(client.is_authenticated())
    })
    .await
    .unwrap();
    assert!(value);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dropped_client_logs_out_in_background() {
    let (server, client) = setup().await;
    drop(client);

    let mut log = request_log(&server).await;
    for _ in 0..50 {
        if log.iter().any(|(m, _)| m == "DELETE") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        log = request_log(&server).await;
    }

    assert_eq!(
        log,
        vec![
            ("POST".to_owned(), api("/login-sessions")),
            ("DELETE".to_owned(), api("/login-sessions")),
        ]
    );
}

#[test]
fn test_invalid_hostname_is_rejected_before_any_request() {
    let err = SwitchConfig::new("bad_host!", "manager", "pw".to_string().into()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

// ── Response decoding ───────────────────────────────────────────────

#[tokio::test]
async fn test_in_band_message_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("/system/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Operation not supported on this platform"
        })))
        .mount(&server)
        .await;

    let err = client.system_status().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Operation not supported on this platform");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    client.close().await;
}

#[tokio::test]
async fn test_non_json_error_status_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("/system/status")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client.system_status().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 502, .. }), "got: {err:?}");
    client.close().await;
}

#[tokio::test]
async fn test_non_json_success_is_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("/system/status")))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let err = client.system_status().await.unwrap_err();
    assert!(matches!(err, Error::Protocol { .. }), "got: {err:?}");
    client.close().await;
}

#[tokio::test]
async fn test_slow_switch_times_out() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(api("/system/status")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "sw" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_millis(200));
    let client = SwitchClient::connect(config).await.unwrap();

    let err = client.system_status().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    client.close().await;
}

#[tokio::test]
async fn test_invalidate_cache_forces_refetch() {
    let (server, mut client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("/ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "port_element": [{ "id": "1", "is_port_enabled": true, "is_port_up": true }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    client.ports_status().await.unwrap();
    client.ports_status().await.unwrap();
    client.invalidate_cache();
    client.ports_status().await.unwrap();
    client.close().await;

    let log = request_log(&server).await;
    assert_eq!(
        log.iter().filter(|(_, p)| p == "/rest/v7/ports").count(),
        2
    );
}
