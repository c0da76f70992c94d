use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{AutomationStatus, InterfaceStatus, PrivacyConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStatus {
    pub preferred_interface: Option<String>,
    pub ip_address: Option<String>,
}

/// One fully aggregated view of all polled state for a single refresh
/// cycle. Never mutated after construction; a newer cycle replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub interfaces: Vec<InterfaceStatus>,
    pub routing: RoutingStatus,
    pub privacy: PrivacyConfig,
    pub automation: AutomationStatus,
    pub taken_at: DateTime<Local>,
}

impl ViewSnapshot {
    pub fn interface(&self, name: &str) -> Option<&InterfaceStatus> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}
