#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use privacyguard_api::models::{AutomationSettings, ConfigPatch, FeatureToggle};
use privacyguard_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Read tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_interfaces() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interfaces": [
                { "name": "eth0", "type": "Ethernet", "is_up": true, "ipv4_address": "10.0.0.2" },
                { "name": "wlan0", "type": "Wi-Fi", "is_up": false }
            ]
        })))
        .mount(&server)
        .await;

    let ifaces = client.list_interfaces().await.unwrap();
    assert_eq!(ifaces.len(), 2);
    assert_eq!(ifaces[0].name, "eth0");
    assert_eq!(ifaces[0].ipv4_address.as_deref(), Some("10.0.0.2"));
    assert_eq!(ifaces[1].kind.as_deref(), Some("Wi-Fi"));
    assert!(ifaces[1].ipv4_address.is_none());
}

#[tokio::test]
async fn test_get_routing_and_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/routing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routing": { "preferred_interface": "eth0", "ip_address": "10.0.0.2" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": { "vpn": { "enabled": true }, "proxy": { "enabled": false } }
        })))
        .mount(&server)
        .await;

    let routing = client.get_routing().await.unwrap();
    assert_eq!(routing.preferred_interface.as_deref(), Some("eth0"));

    let config = client.get_config().await.unwrap();
    assert!(config.vpn.enabled);
    assert!(!config.proxy.enabled);
    assert!(!config.tor.enabled);
}

#[tokio::test]
async fn test_automation_status_counts_rules() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/automation/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "running": true,
            "active_rules": [{ "name": "a" }, { "name": "b" }],
            "last_check": "2024-05-01T09:00:00"
        })))
        .mount(&server)
        .await;

    let status = client.get_automation_status().await.unwrap();
    assert!(status.enabled);
    assert_eq!(status.active_rules.len(), 2);
}

#[tokio::test]
async fn test_get_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "logs": ["first", "second"] })),
        )
        .mount(&server)
        .await;

    let logs = client.get_logs().await.unwrap();
    assert_eq!(logs, vec!["first".to_owned(), "second".to_owned()]);
}

// ── Write tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_interface_sends_enable_flag() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/interface/eth0/toggle"))
        .and(body_json(json!({ "enable": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Interface eth0 enabled",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.toggle_interface("eth0", true).await.unwrap();
    assert_eq!(ack.status.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_update_config_sends_only_changed_feature() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({ "vpn": { "enabled": false } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": { "vpn": { "enabled": false } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ConfigPatch {
        vpn: Some(FeatureToggle { enabled: false }),
        ..ConfigPatch::default()
    };
    client.update_config(&patch).await.unwrap();
}

#[tokio::test]
async fn test_update_config_with_automation_settings() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({
            "automation": { "enabled": true, "check_interval": 120 },
            "tor": { "enabled": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ConfigPatch {
        tor: Some(FeatureToggle { enabled: true }),
        automation: Some(AutomationSettings {
            enabled: true,
            check_interval: 120,
        }),
        ..ConfigPatch::default()
    };
    client.update_config(&patch).await.unwrap();
}

#[tokio::test]
async fn test_set_preferred_interface() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/routing/preferred"))
        .and(body_json(json!({ "interface": "wlan0" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Preferred interface set to wlan0",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_preferred_interface("wlan0").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_2xx_carries_service_error_text() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/interface/eth9/toggle"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Interface eth9 not found",
            "status": "error"
        })))
        .mount(&server)
        .await;

    let err = client.toggle_interface("eth9", true).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500: Interface eth9 not found");
}

#[tokio::test]
async fn test_non_2xx_plain_body_is_previewed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/routing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client.get_routing().await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn test_error_body_with_200_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/automation/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "engine not started" })),
        )
        .mount(&server)
        .await;

    let result = client.get_automation_status().await;
    assert!(
        matches!(&result, Err(Error::Api { message }) if message == "engine not started"),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_schema_mismatch_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "interfaces": "not-a-list" })),
        )
        .mount(&server)
        .await;

    let result = client.list_interfaces().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1.
    let base_url = Url::parse("http://127.0.0.1:1/api").unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    let result = client.get_logs().await;
    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}
