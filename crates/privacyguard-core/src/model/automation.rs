use serde::{Deserialize, Serialize};

/// Rule-engine state from `/automation/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationStatus {
    pub enabled: bool,
    pub active_rules: usize,
    /// Whether the engine's background loop is alive, when reported.
    pub running: Option<bool>,
    pub last_check: Option<String>,
}
