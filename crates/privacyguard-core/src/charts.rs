// ── Chart lifecycle ──
//
// The registry owns the three named charts. Each report disposes the live
// instance of every chart and builds a fresh one from the new data; an
// instance is never updated in place. Every instance carries a generation
// number unique within the registry so callers can tell a rebuilt chart
// from a stale one.

use std::fmt;

use privacyguard_api::models::ReportEnvelope;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{PrivacyFeature, Report, TimelinePoint};

const INVALID_FORMAT: &str = "Invalid data format received from API";

/// The fixed set of charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ChartName {
    NetworkActivity,
    PrivacyUsage,
    AutomationRules,
}

/// Data a chart instance was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartData {
    /// Non-zero buckets, sorted by time label.
    Timeline(Vec<TimelinePoint>),
    /// Event counts per privacy feature, in feature order.
    Distribution(Vec<(PrivacyFeature, u64)>),
    /// Executions per rule, in report order.
    Bars(Vec<(String, u64)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInstance {
    pub generation: u64,
    pub data: ChartData,
}

/// Lifecycle state of one named chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChartSlot {
    /// Never built.
    #[default]
    Absent,
    Live(ChartInstance),
    /// The last instance was torn down and nothing has replaced it yet.
    Disposed { generation: u64 },
}

impl ChartSlot {
    pub fn live(&self) -> Option<&ChartInstance> {
        match self {
            Self::Live(instance) => Some(instance),
            _ => None,
        }
    }
}

/// The three headline totals shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounters {
    pub network: u64,
    pub privacy: u64,
    pub automation: u64,
}

impl fmt::Display for SummaryCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.network, self.privacy, self.automation)
    }
}

/// Owner of every chart instance.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    network: ChartSlot,
    privacy: ChartSlot,
    automation: ChartSlot,
    summary: Option<SummaryCounters>,
    next_generation: u64,
    disposed: u64,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, name: ChartName) -> &ChartSlot {
        match name {
            ChartName::NetworkActivity => &self.network,
            ChartName::PrivacyUsage => &self.privacy,
            ChartName::AutomationRules => &self.automation,
        }
    }

    fn slot_mut(&mut self, name: ChartName) -> &mut ChartSlot {
        match name {
            ChartName::NetworkActivity => &mut self.network,
            ChartName::PrivacyUsage => &mut self.privacy,
            ChartName::AutomationRules => &mut self.automation,
        }
    }

    pub fn summary(&self) -> Option<SummaryCounters> {
        self.summary
    }

    /// Total number of instances torn down so far.
    pub fn disposed_count(&self) -> u64 {
        self.disposed
    }

    /// Replace every chart with one built from `report`.
    pub fn rebuild(&mut self, report: &Report) {
        self.summary = Some(SummaryCounters {
            network: report.network.total,
            privacy: report.privacy.total,
            automation: report.automation.total,
        });

        for name in ChartName::iter() {
            self.dispose(name);
            self.next_generation += 1;
            let instance = ChartInstance {
                generation: self.next_generation,
                data: chart_data(name, report),
            };
            debug!(chart = %name, generation = instance.generation, "chart created");
            *self.slot_mut(name) = ChartSlot::Live(instance);
        }
    }

    /// Tear down the live instance of `name`, if any.
    pub fn dispose(&mut self, name: ChartName) {
        let slot = self.slot_mut(name);
        if let ChartSlot::Live(instance) = slot {
            let generation = instance.generation;
            *slot = ChartSlot::Disposed { generation };
            self.disposed += 1;
            debug!(chart = %name, generation, "chart disposed");
        }
    }

    pub fn dispose_all(&mut self) {
        for name in ChartName::iter() {
            self.dispose(name);
        }
    }
}

fn chart_data(name: ChartName, report: &Report) -> ChartData {
    match name {
        ChartName::NetworkActivity => ChartData::Timeline(prepare_timeline(&report.network.timeline)),
        ChartName::PrivacyUsage => ChartData::Distribution(vec![
            (PrivacyFeature::Vpn, report.privacy.vpn),
            (PrivacyFeature::Proxy, report.privacy.proxy),
            (PrivacyFeature::Tor, report.privacy.tor),
        ]),
        ChartName::AutomationRules => ChartData::Bars(
            report
                .automation
                .rules
                .iter()
                .map(|r| (r.name.clone(), r.executions))
                .collect(),
        ),
    }
}

/// Drop zero-count buckets and order the rest by time label, compared as
/// plain strings. Labels must sort chronologically as strings (`"09:00"`,
/// ISO-8601); other formats get an arbitrary but stable order.
pub fn prepare_timeline(points: &[TimelinePoint]) -> Vec<TimelinePoint> {
    let mut kept: Vec<TimelinePoint> = points.iter().filter(|p| p.count > 0).cloned().collect();
    kept.sort_by(|a, b| a.time.cmp(&b.time));
    kept
}

/// Validate a raw `/reports` payload.
///
/// Anything other than `{"status": "success", "report": {...}}` with the
/// expected field types is rejected.
pub fn parse_report(raw: serde_json::Value) -> Result<Report, CoreError> {
    let envelope: ReportEnvelope = serde_json::from_value(raw).map_err(|e| {
        warn!(error = %e, "report payload does not match schema");
        CoreError::InvalidReport {
            reason: INVALID_FORMAT.to_owned(),
        }
    })?;

    match (envelope.status.as_deref(), envelope.report) {
        (Some("success"), Some(body)) => Ok(body.into()),
        (status, _) => {
            warn!(?status, "report envelope not usable");
            Err(CoreError::InvalidReport {
                reason: INVALID_FORMAT.to_owned(),
            })
        }
    }
}
