// ── Status projection ──
//
// Pure projection of a `ViewSnapshot` onto display state. Every field is
// rebuilt from scratch on each call; nothing is carried over from the
// previous view, so projecting the same snapshot twice yields equal views.

use strum::{Display, IntoEnumIterator};

use crate::model::{InterfaceKind, PrivacyFeature, ViewSnapshot};

pub const NO_INTERFACE: &str = "None";
pub const NO_ADDRESS: &str = "Not available";
pub const NO_IP: &str = "No IP";
pub const ENABLED: &str = "Enabled";
pub const DISABLED: &str = "Disabled";

/// Colour class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
}

impl Tone {
    fn of(enabled: bool) -> Self {
        if enabled { Self::Good } else { Self::Bad }
    }
}

/// The next action an interface row's toggle control performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ToggleAction {
    #[strum(serialize = "Enable")]
    Enable,
    #[strum(serialize = "Disable")]
    Disable,
}

impl ToggleAction {
    /// Enable when down, disable when up.
    pub fn for_state(is_up: bool) -> Self {
        if is_up { Self::Disable } else { Self::Enable }
    }

    /// The `enable` flag this action sends to the service.
    pub fn enables(self) -> bool {
        matches!(self, Self::Enable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeRow {
    pub label: &'static str,
    pub tone: Tone,
}

impl BadgeRow {
    fn of(enabled: bool) -> Self {
        Self {
            label: if enabled { ENABLED } else { DISABLED },
            tone: Tone::of(enabled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyRow {
    pub feature: PrivacyFeature,
    pub enabled: bool,
    pub badge: BadgeRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationRow {
    pub badge: BadgeRow,
    pub active_rules: usize,
    pub last_check: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRow {
    pub name: String,
    pub kind: InterfaceKind,
    /// The address, or the `No IP` placeholder.
    pub address: String,
    pub is_up: bool,
    pub action: ToggleAction,
}

/// Display state for the status sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub current_interface: String,
    pub ip_address: String,
    pub privacy: Vec<PrivacyRow>,
    pub automation: AutomationRow,
    pub interfaces: Vec<InterfaceRow>,
}

impl StatusView {
    pub fn project(snapshot: &ViewSnapshot) -> Self {
        let routing = &snapshot.routing;

        let privacy = PrivacyFeature::iter()
            .map(|feature| {
                let enabled = snapshot.privacy.get(feature).enabled;
                PrivacyRow {
                    feature,
                    enabled,
                    badge: BadgeRow::of(enabled),
                }
            })
            .collect();

        let interfaces = snapshot
            .interfaces
            .iter()
            .map(|iface| InterfaceRow {
                name: iface.name.clone(),
                kind: iface.kind,
                address: iface
                    .ipv4
                    .map_or_else(|| NO_IP.to_owned(), |ip| ip.to_string()),
                is_up: iface.is_up,
                action: ToggleAction::for_state(iface.is_up),
            })
            .collect();

        Self {
            current_interface: routing
                .preferred_interface
                .clone()
                .unwrap_or_else(|| NO_INTERFACE.to_owned()),
            ip_address: routing
                .ip_address
                .clone()
                .unwrap_or_else(|| NO_ADDRESS.to_owned()),
            privacy,
            automation: AutomationRow {
                badge: BadgeRow::of(snapshot.automation.enabled),
                active_rules: snapshot.automation.active_rules,
                last_check: snapshot.automation.last_check.clone(),
            },
            interfaces,
        }
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceRow> {
        self.interfaces.iter().find(|row| row.name == name)
    }

    pub fn privacy_row(&self, feature: PrivacyFeature) -> Option<&PrivacyRow> {
        self.privacy.iter().find(|row| row.feature == feature)
    }
}
