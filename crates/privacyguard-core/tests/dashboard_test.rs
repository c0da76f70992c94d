#![allow(clippy::unwrap_used)]
// Integration tests for the `Dashboard` engine and `ViewContext` using wiremock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use privacyguard_api::ApiClient;
use privacyguard_core::{
    ChartData, ChartName, Command, CommandOutcome, CoreError, Dashboard, DashboardConfig,
    MemoryStore, PrivacyFeature, RefreshOutcome, RefreshState, SyncEvent, ToggleAction,
    ViewContext,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn interfaces(eth0_up: bool) -> Value {
    json!({
        "interfaces": [
            { "name": "eth0", "type": "Ethernet", "is_up": eth0_up, "ipv4_address": "10.0.0.2" },
            { "name": "wlan0", "type": "Wi-Fi", "is_up": false }
        ]
    })
}

fn config(vpn: bool, proxy: bool, tor: bool) -> Value {
    json!({
        "config": {
            "vpn": { "enabled": vpn },
            "proxy": { "enabled": proxy },
            "tor": { "enabled": tor }
        }
    })
}

fn report() -> Value {
    json!({
        "status": "success",
        "report": {
            "networkEvents": {
                "total": 12,
                "timeline": [{ "time": "10:00", "count": 0 }, { "time": "09:00", "count": 5 }]
            },
            "privacyEvents": { "total": 3, "vpn": 1, "proxy": 2, "tor": 0 },
            "automationEvents": { "total": 2, "rules": [{ "name": "r1", "executions": 2 }] }
        }
    })
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount the four status reads plus `/reports`.
async fn mount_status(server: &MockServer, eth0_up: bool, privacy: Value) {
    mount_get(server, "/interfaces", interfaces(eth0_up)).await;
    mount_get(
        server,
        "/routing",
        json!({ "routing": { "preferred_interface": "eth0", "ip_address": "10.0.0.2" } }),
    )
    .await;
    mount_get(server, "/config", privacy).await;
    mount_get(
        server,
        "/automation/status",
        json!({ "enabled": true, "active_rules": [{ "name": "r1" }] }),
    )
    .await;
    mount_get(server, "/reports", report()).await;
}

async fn setup() -> (MockServer, Dashboard, UnboundedReceiver<SyncEvent>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url.clone());
    let (dashboard, events) = Dashboard::with_client(client, DashboardConfig::new(base_url));
    (server, dashboard, events)
}

fn view() -> ViewContext {
    let url = Url::parse("http://localhost:8001/api").unwrap();
    ViewContext::new(Box::new(MemoryStore::new()), &DashboardConfig::new(url), None)
}

fn drain(events: &mut UnboundedReceiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Wait for the engine's first refresh outcome after `start()`.
async fn wait_for_refresh(events: &mut UnboundedReceiver<SyncEvent>) -> RefreshOutcome {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(SyncEvent::Refresh(outcome)) = events.recv().await {
                return outcome;
            }
        }
    })
    .await
    .unwrap()
}

// ── Refresh tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_publishes_snapshot_and_report() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, true, config(true, false, false)).await;

    let outcome = dashboard.refresh().await;
    assert!(outcome.is_published(), "got {outcome:?}");
    assert_eq!(dashboard.refresh_state(), RefreshState::Idle);

    let snapshot = dashboard.snapshot().unwrap();
    assert_eq!(snapshot.interfaces.len(), 2);
    assert!(snapshot.privacy.vpn.enabled);
    assert_eq!(snapshot.automation.active_rules, 1);

    let mut ctx = view();
    for event in drain(&mut events) {
        ctx.apply(event, Instant::now());
    }
    let status = ctx.status().unwrap();
    assert_eq!(status.current_interface, "eth0");
    assert_eq!(
        ctx.feedback().log().next().unwrap().message,
        "Dashboard refreshed successfully"
    );
}

#[tokio::test]
async fn test_failed_read_publishes_nothing() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, true, config(true, true, false)).await;

    let mut ctx = view();
    dashboard.refresh().await;
    for event in drain(&mut events) {
        ctx.apply(event, Instant::now());
    }
    let before_snapshot = dashboard.snapshot().unwrap();
    let before_view = ctx.status().cloned().unwrap();

    server.reset().await;
    mount_get(&server, "/interfaces", interfaces(false)).await;
    mount_get(&server, "/config", config(false, false, false)).await;
    mount_get(&server, "/automation/status", json!({ "enabled": false })).await;
    Mock::given(method("GET"))
        .and(path("/api/routing"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "routing table unavailable",
            "status": "error"
        })))
        .mount(&server)
        .await;

    let outcome = dashboard.refresh().await;
    let RefreshOutcome::Failed { message, .. } = &outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(message, "/routing: HTTP 500: routing table unavailable");

    assert!(Arc::ptr_eq(&before_snapshot, &dashboard.snapshot().unwrap()));
    for event in drain(&mut events) {
        ctx.apply(event, Instant::now());
    }
    assert_eq!(ctx.status().cloned().unwrap(), before_view);
    assert_eq!(
        ctx.feedback().log().next().unwrap().message,
        "Failed to refresh dashboard: /routing: HTTP 500: routing table unavailable"
    );
}

#[tokio::test]
async fn test_report_failure_does_not_abort_snapshot() {
    let (server, dashboard, mut events) = setup().await;
    mount_get(&server, "/interfaces", interfaces(true)).await;
    mount_get(&server, "/routing", json!({ "routing": {} })).await;
    mount_get(&server, "/config", config(false, false, false)).await;
    mount_get(&server, "/automation/status", json!({ "enabled": false })).await;
    mount_get(&server, "/reports", json!({ "status": "error" })).await;

    let outcome = dashboard.refresh().await;
    assert!(outcome.is_published());
    assert!(dashboard.report().is_none());

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert!(!events.iter().any(|e| matches!(e, SyncEvent::Report(_))));
}

#[tokio::test]
async fn test_report_renders_counters_and_charts() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, true, config(false, false, false)).await;

    dashboard.refresh().await;
    let mut ctx = view();
    for event in drain(&mut events) {
        ctx.apply(event, Instant::now());
    }

    let charts = ctx.charts();
    assert_eq!(charts.summary().unwrap().to_string(), "12, 3, 2");

    let timeline = &charts.slot(ChartName::NetworkActivity).live().unwrap().data;
    let ChartData::Timeline(points) = timeline else {
        panic!("expected timeline, got {timeline:?}");
    };
    let points: Vec<(&str, u64)> = points.iter().map(|p| (p.time.as_str(), p.count)).collect();
    assert_eq!(points, vec![("09:00", 5)]);

    let dist = &charts.slot(ChartName::PrivacyUsage).live().unwrap().data;
    let ChartData::Distribution(values) = dist else {
        panic!("expected distribution, got {dist:?}");
    };
    let values: Vec<u64> = values.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![1, 2, 0]);

    assert_eq!(
        charts.slot(ChartName::AutomationRules).live().unwrap().data,
        ChartData::Bars(vec![("r1".to_owned(), 2)])
    );
}

#[tokio::test]
async fn test_stale_cycle_is_superseded() {
    let (server, dashboard, mut events) = setup().await;

    // The first /interfaces request is slow; later ones answer at once.
    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(interfaces(false))
                .set_delay(Duration::from_millis(500)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, true, config(false, false, false)).await;

    let slow = dashboard.clone();
    let fast = dashboard.clone();
    let (first, second) = tokio::join!(async move { slow.refresh().await }, async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        fast.refresh().await
    });

    assert!(second.is_published(), "newer cycle should publish: {second:?}");
    assert!(
        matches!(first, RefreshOutcome::Superseded { generation } if generation < second.generation()),
        "older cycle should be superseded: {first:?}"
    );
    assert!(dashboard.snapshot().unwrap().interfaces[0].is_up);

    let outcomes = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, SyncEvent::Refresh(_)))
        .count();
    assert_eq!(outcomes, 2);
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_execute_requires_running_engine() {
    let (_server, dashboard, _events) = setup().await;
    let result = dashboard
        .execute(Command::SetPreferredInterface {
            name: "eth0".into(),
        })
        .await;
    assert_eq!(result.unwrap_err(), CoreError::Disconnected);
}

#[tokio::test]
async fn test_toggle_interface_then_refresh_flips_action() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, false, config(false, false, false)).await;

    dashboard.start().await.unwrap();
    assert!(wait_for_refresh(&mut events).await.is_published());

    let mut ctx = view();
    ctx.apply(
        SyncEvent::Refresh(RefreshOutcome::Published {
            generation: 1,
            snapshot: dashboard.snapshot().unwrap(),
        }),
        Instant::now(),
    );
    let cmd = ctx.interface_command("eth0").unwrap();
    assert_eq!(
        cmd,
        Command::ToggleInterface {
            name: "eth0".into(),
            enable: true
        }
    );

    server.reset().await;
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
    mount_status(&server, true, config(false, false, false)).await;

    drain(&mut events);
    let result = dashboard.execute(cmd).await.unwrap();
    assert_eq!(result.message, "eth0 enabled successfully");
    assert!(result.refresh.is_published());

    for event in drain(&mut events) {
        ctx.apply(event, Instant::now());
    }
    let row = ctx.status().unwrap().interface("eth0").unwrap();
    assert!(row.is_up);
    assert_eq!(row.action, ToggleAction::Disable);

    let log: Vec<String> = ctx.feedback().log().map(|e| e.message.clone()).collect();
    assert!(log.contains(&"eth0 enabled successfully".to_owned()));

    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_partial_config_update_keeps_other_features() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, true, config(true, true, false)).await;

    dashboard.start().await.unwrap();
    wait_for_refresh(&mut events).await;

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({ "vpn": { "enabled": false } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(config(false, true, false)))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, true, config(false, true, false)).await;

    let result = dashboard
        .execute(Command::SetPrivacyFeature {
            feature: PrivacyFeature::Vpn,
            enabled: false,
        })
        .await
        .unwrap();
    assert_eq!(result.message, "VPN disabled successfully");

    let RefreshOutcome::Published { snapshot, .. } = result.refresh else {
        panic!("follow-up refresh should publish");
    };
    assert!(!snapshot.privacy.vpn.enabled);
    assert!(snapshot.privacy.proxy.enabled);
    assert!(!snapshot.privacy.tor.enabled);

    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_failed_command_changes_nothing() {
    let (server, dashboard, mut events) = setup().await;
    mount_status(&server, true, config(false, false, false)).await;

    dashboard.start().await.unwrap();
    wait_for_refresh(&mut events).await;
    let before = dashboard.snapshot().unwrap();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/interface/eth0/toggle"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "permission denied",
            "status": "error"
        })))
        .mount(&server)
        .await;
    // No follow-up refresh may happen after a failed write.
    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(interfaces(true)))
        .expect(0)
        .mount(&server)
        .await;

    drain(&mut events);
    let err = dashboard
        .execute(Command::ToggleInterface {
            name: "eth0".into(),
            enable: false,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to disable eth0: HTTP 500: permission denied"
    );

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        SyncEvent::Command(CommandOutcome::Failed { message })
            if message == "Failed to disable eth0: HTTP 500: permission denied"
    ));
    assert!(Arc::ptr_eq(&before, &dashboard.snapshot().unwrap()));

    dashboard.shutdown().await;
}

// ── On-demand reads ─────────────────────────────────────────────────

#[tokio::test]
async fn test_server_logs_newest_first() {
    let (server, dashboard, _events) = setup().await;
    mount_get(
        &server,
        "/logs",
        json!({ "logs": ["08:00 boot", "08:05 vpn up", "08:10 tor up"] }),
    )
    .await;

    let logs = dashboard.fetch_server_logs().await.unwrap();
    assert_eq!(logs, vec!["08:10 tor up", "08:05 vpn up", "08:00 boot"]);
}

#[tokio::test]
async fn test_interface_status_read() {
    let (server, dashboard, _events) = setup().await;
    mount_get(
        &server,
        "/interface/wlan0/status",
        json!({
            "interface_status": { "name": "wlan0", "type": "Wi-Fi", "is_up": true, "ipv4_address": "192.168.1.20" },
            "status": "success"
        }),
    )
    .await;

    let status = dashboard.interface_status("wlan0").await.unwrap();
    assert!(status.is_up);
    assert_eq!(status.ipv4.unwrap().to_string(), "192.168.1.20");
}
