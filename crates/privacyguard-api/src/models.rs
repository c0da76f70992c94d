// Control API wire types
//
// Request and response bodies for the appliance control API. Fields carry
// `#[serde(default)]` wherever the service omits them in practice (older
// backends drop `ipv4_address` for down links, `routing` is sparse until a
// preferred interface has been chosen).

use serde::{Deserialize, Serialize};

// ── Interfaces ───────────────────────────────────────────────────────

/// One interface from `GET /interfaces`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceEntry {
    pub name: String,
    /// Free-form type label, e.g. `"Ethernet"` or `"Wi-Fi"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_up: bool,
    #[serde(default)]
    pub ipv4_address: Option<String>,
}

/// `{ "interfaces": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct InterfacesResponse {
    pub interfaces: Vec<InterfaceEntry>,
}

/// `GET /interface/{name}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceStatusResponse {
    pub interface_status: InterfaceEntry,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body for `POST /interface/{name}/toggle`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleRequest {
    pub enable: bool,
}

// ── Routing ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingInfo {
    #[serde(default)]
    pub preferred_interface: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// `{ "routing": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub routing: RoutingInfo,
}

/// Body for `POST /routing/preferred`.
#[derive(Debug, Clone, Serialize)]
pub struct PreferredRouteRequest {
    pub interface: String,
}

// ── Privacy configuration ────────────────────────────────────────────

/// `{ "enabled": bool }` sub-object used by every privacy feature.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureToggle {
    #[serde(default)]
    pub enabled: bool,
}

/// Full privacy configuration as returned by `GET /config`.
///
/// A feature object missing from the body reads as disabled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacyConfigBody {
    #[serde(default)]
    pub vpn: FeatureToggle,
    #[serde(default)]
    pub proxy: FeatureToggle,
    #[serde(default)]
    pub tor: FeatureToggle,
}

/// `{ "config": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResponse {
    #[serde(default)]
    pub config: PrivacyConfigBody,
}

/// Automation settings as accepted by `POST /config`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutomationSettings {
    pub enabled: bool,
    pub check_interval: u64,
}

/// Partial configuration write for `POST /config`.
///
/// Only populated fields are serialized, so a single-feature toggle sends
/// exactly one sub-object and leaves the others untouched server-side.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tor: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<AutomationSettings>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.vpn.is_none() && self.proxy.is_none() && self.tor.is_none() && self.automation.is_none()
    }
}

// ── Automation ───────────────────────────────────────────────────────

/// `GET /automation/status`
///
/// `active_rules` is a list of rule objects whose shape varies by rule
/// type; only its length matters to the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct AutomationStatusResponse {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub running: Option<bool>,
    #[serde(default)]
    pub active_rules: Vec<serde_json::Value>,
    #[serde(default)]
    pub last_check: Option<String>,
}

// ── Misc ─────────────────────────────────────────────────────────────

/// Generic `{ "message", "status" }` acknowledgement returned by writes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `{ "logs": [...] }`, oldest line first.
#[derive(Debug, Clone, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}

// ── Reports ──────────────────────────────────────────────────────────

/// `GET /reports` envelope. `status` is `"success"` when `report` is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub report: Option<ReportBody>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportBody {
    #[serde(default)]
    pub network_events: NetworkEventsBody,
    #[serde(default)]
    pub privacy_events: PrivacyEventsBody,
    #[serde(default)]
    pub automation_events: AutomationEventsBody,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NetworkEventsBody {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub timeline: Vec<TimelineBucket>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TimelineBucket {
    pub time: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PrivacyEventsBody {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub vpn: u64,
    #[serde(default)]
    pub proxy: u64,
    #[serde(default)]
    pub tor: u64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AutomationEventsBody {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub rules: Vec<RuleBucket>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleBucket {
    pub name: String,
    #[serde(default)]
    pub executions: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn interface_entry_reads_type_field() {
        let entry: InterfaceEntry = serde_json::from_value(json!({
            "name": "wlan0",
            "type": "Wi-Fi",
            "is_up": true,
            "ipv4_address": "192.168.1.5"
        }))
        .unwrap();
        assert_eq!(entry.kind.as_deref(), Some("Wi-Fi"));
        assert!(entry.is_up);
    }

    #[test]
    fn missing_feature_objects_default_to_disabled() {
        let resp: ConfigResponse =
            serde_json::from_value(json!({ "config": { "vpn": { "enabled": true } } })).unwrap();
        assert!(resp.config.vpn.enabled);
        assert!(!resp.config.proxy.enabled);
        assert!(!resp.config.tor.enabled);
    }

    #[test]
    fn config_patch_serializes_only_populated_fields() {
        let patch = ConfigPatch {
            vpn: Some(FeatureToggle { enabled: false }),
            ..ConfigPatch::default()
        };
        assert_eq!(
            serde_json::to_value(patch).unwrap(),
            json!({ "vpn": { "enabled": false } })
        );
        assert!(ConfigPatch::default().is_empty());
    }

    #[test]
    fn report_body_uses_camel_case_sections() {
        let env: ReportEnvelope = serde_json::from_value(json!({
            "status": "success",
            "report": {
                "networkEvents": { "total": 12, "timeline": [{ "time": "09:00", "count": 5 }] },
                "privacyEvents": { "total": 3, "vpn": 1, "proxy": 2, "tor": 0 },
                "automationEvents": { "total": 2, "rules": [{ "name": "r1", "executions": 2 }] }
            }
        }))
        .unwrap();
        let report = env.report.unwrap();
        assert_eq!(report.network_events.total, 12);
        assert_eq!(report.privacy_events.proxy, 2);
        assert_eq!(report.automation_events.rules[0].name, "r1");
    }
}
