// ── Wire → domain conversions ──
//
// Maps `privacyguard_api::models` types onto the canonical domain model.
// Schema mismatches degrade here: unknown interface types read as wired,
// unparseable addresses are dropped, absent fields take their defaults.

use std::net::Ipv4Addr;

use privacyguard_api::models::{
    AutomationStatusResponse, InterfaceEntry, PrivacyConfigBody, ReportBody, RoutingInfo,
};
use tracing::debug;

use crate::model::{
    AutomationEvents, AutomationStatus, FeatureState, InterfaceKind, InterfaceStatus,
    NetworkEvents, PrivacyConfig, PrivacyEvents, Report, RoutingStatus, RuleExecutions,
    TimelinePoint,
};

impl InterfaceKind {
    /// Classify a free-form type label. `"Wi-Fi"` (any case, also
    /// `"wifi"` and `"wireless"`) is wireless; everything else is wired.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        match lower.as_str() {
            "wi-fi" | "wifi" | "wireless" => Self::Wireless,
            _ => Self::Wired,
        }
    }
}

impl From<InterfaceEntry> for InterfaceStatus {
    fn from(entry: InterfaceEntry) -> Self {
        let ipv4 = entry.ipv4_address.as_deref().and_then(|raw| {
            let parsed = raw.trim().parse::<Ipv4Addr>().ok();
            if parsed.is_none() && !raw.trim().is_empty() {
                debug!(interface = %entry.name, address = raw, "dropping unparseable IPv4 address");
            }
            parsed
        });

        Self {
            kind: entry
                .kind
                .as_deref()
                .map_or(InterfaceKind::Wired, InterfaceKind::from_label),
            is_up: entry.is_up,
            ipv4,
            name: entry.name,
        }
    }
}

impl From<RoutingInfo> for RoutingStatus {
    fn from(info: RoutingInfo) -> Self {
        Self {
            preferred_interface: info.preferred_interface.filter(|s| !s.is_empty()),
            ip_address: info.ip_address.filter(|s| !s.is_empty()),
        }
    }
}

impl From<PrivacyConfigBody> for PrivacyConfig {
    fn from(body: PrivacyConfigBody) -> Self {
        Self {
            vpn: FeatureState {
                enabled: body.vpn.enabled,
            },
            proxy: FeatureState {
                enabled: body.proxy.enabled,
            },
            tor: FeatureState {
                enabled: body.tor.enabled,
            },
        }
    }
}

impl From<AutomationStatusResponse> for AutomationStatus {
    fn from(resp: AutomationStatusResponse) -> Self {
        Self {
            enabled: resp.enabled,
            active_rules: resp.active_rules.len(),
            running: resp.running,
            last_check: resp.last_check,
        }
    }
}

impl From<ReportBody> for Report {
    fn from(body: ReportBody) -> Self {
        Self {
            network: NetworkEvents {
                total: body.network_events.total,
                timeline: body
                    .network_events
                    .timeline
                    .into_iter()
                    .map(|b| TimelinePoint {
                        time: b.time,
                        count: b.count,
                    })
                    .collect(),
            },
            privacy: PrivacyEvents {
                total: body.privacy_events.total,
                vpn: body.privacy_events.vpn,
                proxy: body.privacy_events.proxy,
                tor: body.privacy_events.tor,
            },
            automation: AutomationEvents {
                total: body.automation_events.total,
                rules: body
                    .automation_events
                    .rules
                    .into_iter()
                    .map(|r| RuleExecutions {
                        name: r.name,
                        executions: r.executions,
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: Option<&str>, addr: Option<&str>) -> InterfaceEntry {
        InterfaceEntry {
            name: "if0".into(),
            kind: kind.map(Into::into),
            is_up: true,
            ipv4_address: addr.map(Into::into),
        }
    }

    #[test]
    fn wifi_labels_are_wireless() {
        for label in ["Wi-Fi", "wi-fi", "WiFi", "wireless"] {
            assert_eq!(InterfaceKind::from_label(label), InterfaceKind::Wireless, "{label}");
        }
        assert_eq!(InterfaceKind::from_label("Ethernet"), InterfaceKind::Wired);
        assert_eq!(InterfaceKind::from_label(""), InterfaceKind::Wired);
    }

    #[test]
    fn missing_type_is_wired() {
        let status = InterfaceStatus::from(entry(None, None));
        assert_eq!(status.kind, InterfaceKind::Wired);
        assert!(status.ipv4.is_none());
    }

    #[test]
    fn bad_address_is_dropped() {
        let status = InterfaceStatus::from(entry(Some("Ethernet"), Some("not-an-ip")));
        assert!(status.ipv4.is_none());

        let status = InterfaceStatus::from(entry(Some("Ethernet"), Some("10.1.2.3")));
        assert_eq!(status.ipv4, Some(Ipv4Addr::new(10, 1, 2, 3)));
    }

    #[test]
    fn empty_routing_fields_are_none() {
        let routing = RoutingStatus::from(RoutingInfo {
            preferred_interface: Some(String::new()),
            ip_address: Some("10.0.0.2".into()),
        });
        assert!(routing.preferred_interface.is_none());
        assert_eq!(routing.ip_address.as_deref(), Some("10.0.0.2"));
    }
}
