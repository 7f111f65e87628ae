#![allow(clippy::unwrap_used)]
// VLAN and VLAN/port membership operations against a wiremock switch.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arubaos_api::{Error, Outcome};
use common::{api, request_log, setup, vlan_port, vlans_ports_body};

async fn mount_vlans(server: &MockServer, ids: &[u16]) {
    let elements: Vec<_> = ids
        .iter()
        .map(|id| json!({ "vlan_id": id, "name": format!("VLAN{id}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path(api("/vlans")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vlan_element": elements })))
        .mount(server)
        .await;
}

/// Writes only, login/logout excluded.
async fn writes(server: &MockServer) -> Vec<(String, String)> {
    request_log(server)
        .await
        .into_iter()
        .filter(|(m, p)| m != "GET" && !p.ends_with("/login-sessions"))
        .collect()
}

// ── VLANs ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_existing_vlan_sends_no_post() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1, 10]).await;
    Mock::given(method("POST"))
        .and(path(api("/vlans")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client.create_vlan(10, "users").await.unwrap();
    assert_eq!(outcome, Outcome::AlreadySatisfied);
    client.close().await;
}

#[tokio::test]
async fn test_create_vlan_checks_echo() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1]).await;
    Mock::given(method("POST"))
        .and(path(api("/vlans")))
        .and(body_partial_json(json!({ "vlan_id": 20, "name": "iot" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "vlan_id": 20, "name": "iot" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("/vlans")))
        .and(body_partial_json(json!({ "vlan_id": 30 })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "vlan_id": 30, "name": "VLAN30" })),
        )
        .mount(&server)
        .await;

    assert_eq!(client.create_vlan(20, "iot").await.unwrap(), Outcome::Applied);

    let outcome = client.create_vlan(30, "cameras").await.unwrap();
    assert!(
        matches!(&outcome, Outcome::NotApplied { reason } if reason.contains("VLAN30")),
        "got: {outcome:?}"
    );
    client.close().await;
}

#[tokio::test]
async fn test_vlan_list_is_cached_until_a_vlan_is_created() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1]).await;
    Mock::given(method("POST"))
        .and(path(api("/vlans")))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "vlan_id": 40, "name": "lab" })),
        )
        .mount(&server)
        .await;

    client.vlans().await.unwrap();
    client.vlans().await.unwrap();
    client.create_vlan(40, "lab").await.unwrap();
    client.vlans().await.unwrap();
    client.close().await;

    let gets = request_log(&server)
        .await
        .into_iter()
        .filter(|(m, p)| m == "GET" && p == "/rest/v7/vlans")
        .count();
    assert_eq!(gets, 2);
}

#[tokio::test]
async fn test_update_missing_vlan_is_not_applied_without_request() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1]).await;
    Mock::given(method("POST"))
        .and(path(api("/vlans/30")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client.update_vlan(30, "renamed").await.unwrap();
    assert!(!outcome.is_success());
    client.close().await;
}

#[tokio::test]
async fn test_update_existing_vlan() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1, 30]).await;
    Mock::given(method("POST"))
        .and(path(api("/vlans/30")))
        .and(body_partial_json(json!({ "name": "renamed" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "vlan_id": 30, "name": "renamed" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.update_vlan(30, "renamed").await.unwrap(), Outcome::Applied);
    client.close().await;
}

#[tokio::test]
async fn test_delete_missing_vlan_sends_no_delete() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1]).await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans/99")))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(client.delete_vlan(99).await.unwrap(), Outcome::AlreadySatisfied);
    client.close().await;
}

#[tokio::test]
async fn test_delete_vlan() {
    let (server, mut client) = setup().await;
    mount_vlans(&server, &[1, 99]).await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans/99")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.delete_vlan(99).await.unwrap(), Outcome::Applied);
    client.close().await;
}

// ── Derived association reads ───────────────────────────────────────

#[tokio::test]
async fn test_association_views() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "1/1", "POM_UNTAGGED"),
            vlan_port(5, "1/1", "POM_TAGGED_STATIC"),
            vlan_port(6, "1/1", "POM_TAGGED_STATIC"),
            vlan_port(5, "1/2", "POM_UNTAGGED"),
            vlan_port(7, "1/2", "POM_FORBIDDEN"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let untagged = client.untagged_vlan_port("1/1").await.unwrap().unwrap();
    assert_eq!(untagged.vlan_id, 1);

    let tagged: Vec<u16> = client
        .tagged_vlans_port("1/1")
        .await
        .unwrap()
        .iter()
        .map(|a| a.vlan_id)
        .collect();
    assert_eq!(tagged, vec![5, 6]);

    let on_vlan5: Vec<String> = client
        .vlan_ports(5)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.port_id)
        .collect();
    assert_eq!(on_vlan5, vec!["1/1".to_owned(), "1/2".to_owned()]);

    assert_eq!(client.vlans_port("1/2").await.unwrap().len(), 2);
    assert!(client.vlan_ports(999).await.unwrap().is_empty());
    assert!(client.untagged_vlan_port("9/9").await.unwrap().is_none());
    client.close().await;
}

// ── Untagged membership ─────────────────────────────────────────────

#[tokio::test]
async fn test_set_untagged_removes_tagged_association_first() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "1/1", "POM_UNTAGGED"),
            vlan_port(5, "1/1", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans-ports/5-1/1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("/vlans-ports")))
        .and(body_partial_json(vlan_port(5, "1/1", "POM_UNTAGGED")))
        .respond_with(ResponseTemplate::new(201).set_body_json(vlan_port(5, "1/1", "POM_UNTAGGED")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.set_untagged_vlan_port(5, "1/1").await.unwrap();
    assert_eq!(outcome, Outcome::Applied);
    client.close().await;

    assert_eq!(
        writes(&server).await,
        vec![
            ("DELETE".to_owned(), "/rest/v7/vlans-ports/5-1/1".to_owned()),
            ("POST".to_owned(), "/rest/v7/vlans-ports".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_set_untagged_already_in_place() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vlans_ports_body(&[vlan_port(10, "2", "POM_UNTAGGED")])),
        )
        .mount(&server)
        .await;

    let outcome = client.set_untagged_vlan_port(10, "2").await.unwrap();
    assert_eq!(outcome, Outcome::AlreadySatisfied);
    client.close().await;
    assert!(writes(&server).await.is_empty());
}

#[tokio::test]
async fn test_set_untagged_fails_hard_when_tagged_removal_fails() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "3", "POM_UNTAGGED"),
            vlan_port(5, "3", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans-ports/5-3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Port 3 is a member of a trunk"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.set_untagged_vlan_port(5, "3").await.unwrap_err();
    assert!(matches!(err, Error::Mutation { .. }), "got: {err:?}");
    assert!(err.to_string().contains("VLAN 5"));
    assert!(matches!(err.root_cause(), Error::Api { .. }));
    client.close().await;
}

#[tokio::test]
async fn test_set_untagged_rejects_body_on_removal() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(5, "4", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans-ports/5-4")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = client.set_untagged_vlan_port(5, "4").await.unwrap_err();
    assert!(matches!(err.root_cause(), Error::Protocol { .. }), "got: {err:?}");
    client.close().await;
}

// ── Tagged membership ───────────────────────────────────────────────

async fn mount_tagged_post(server: &MockServer, vlan: u16, port: &str) {
    Mock::given(method("POST"))
        .and(path(api("/vlans-ports")))
        .and(body_partial_json(vlan_port(vlan, port, "POM_TAGGED_STATIC")))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(vlan_port(vlan, port, "POM_TAGGED_STATIC")),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_set_tagged_vlans_converges_and_verifies() {
    let (server, mut client) = setup().await;

    // Before the change: untagged 1, tagged 7.
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "1/1", "POM_UNTAGGED"),
            vlan_port(7, "1/1", "POM_TAGGED_STATIC"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // After: untagged 1, tagged 5 and 6.
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "1/1", "POM_UNTAGGED"),
            vlan_port(6, "1/1", "POM_TAGGED_STATIC"),
            vlan_port(5, "1/1", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;
    mount_tagged_post(&server, 6, "1/1").await;
    mount_tagged_post(&server, 5, "1/1").await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans-ports/7-1/1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.set_tagged_vlans_port(&[6, 5, 6], "1/1").await.unwrap();
    assert_eq!(outcome, Outcome::Applied);

    let tagged: Vec<u16> = client
        .tagged_vlans_port("1/1")
        .await
        .unwrap()
        .iter()
        .map(|a| a.vlan_id)
        .collect();
    assert_eq!(tagged, vec![6, 5]);
    client.close().await;

    let posted: Vec<u16> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/rest/v7/vlans-ports")
        .map(|r| {
            let body: serde_json::Value = r.body_json().unwrap();
            u16::try_from(body["vlan_id"].as_u64().unwrap()).unwrap()
        })
        .collect();
    assert_eq!(posted, vec![6, 5]);
}

#[tokio::test]
async fn test_set_tagged_rejects_untagged_vlan_before_writing() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(1, "1/1", "POM_UNTAGGED"),
        ])))
        .mount(&server)
        .await;

    let err = client.set_tagged_vlans_port(&[1, 5], "1/1").await.unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }), "got: {err:?}");
    client.close().await;
    assert!(writes(&server).await.is_empty());
}

#[tokio::test]
async fn test_set_tagged_already_satisfied() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(5, "1/1", "POM_TAGGED_STATIC"),
            vlan_port(6, "1/1", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;

    let outcome = client.set_tagged_vlans_port(&[6, 5], "1/1").await.unwrap();
    assert_eq!(outcome, Outcome::AlreadySatisfied);
    client.close().await;
    assert!(writes(&server).await.is_empty());
}

#[tokio::test]
async fn test_set_tagged_reports_divergence_after_writes() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[])))
        .mount(&server)
        .await;
    mount_tagged_post(&server, 5, "1/1").await;

    // The switch acknowledges the add but the re-read still shows nothing.
    let err = client.set_tagged_vlans_port(&[5], "1/1").await.unwrap_err();
    assert!(matches!(err, Error::Postcondition { .. }), "got: {err:?}");
    client.close().await;
}

#[tokio::test]
async fn test_set_tagged_failed_add_names_initial_and_wanted_sets() {
    let (server, mut client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlans_ports_body(&[
            vlan_port(7, "1/1", "POM_TAGGED_STATIC"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("/vlans-ports")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "VLAN 8 does not exist"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("/vlans-ports/7-1/1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.set_tagged_vlans_port(&[8], "1/1").await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("initial: [7]"), "got: {text}");
    assert!(text.contains("wanted: [8]"), "got: {text}");
    client.close().await;
}
