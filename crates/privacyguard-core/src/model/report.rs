use serde::{Deserialize, Serialize};

/// Aggregated activity report backing the summary counters and charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub network: NetworkEvents,
    pub privacy: PrivacyEvents,
    pub automation: AutomationEvents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEvents {
    pub total: u64,
    pub timeline: Vec<TimelinePoint>,
}

/// One bucket of the network activity timeline. `time` is a label that
/// sorts chronologically as a plain string (e.g. `"09:00"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub time: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyEvents {
    pub total: u64,
    pub vpn: u64,
    pub proxy: u64,
    pub tor: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationEvents {
    pub total: u64,
    pub rules: Vec<RuleExecutions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleExecutions {
    pub name: String,
    pub executions: u64,
}
