// ── Domain model ──
//
// Canonical dashboard types, independent of the wire format. Wire types from
// `privacyguard_api::models` are converted in `crate::convert`.

pub mod automation;
pub mod interface;
pub mod privacy;
pub mod report;
pub mod snapshot;

pub use automation::AutomationStatus;
pub use interface::{InterfaceKind, InterfaceStatus};
pub use privacy::{FeatureState, PrivacyConfig, PrivacyFeature};
pub use report::{
    AutomationEvents, NetworkEvents, PrivacyEvents, Report, RuleExecutions, TimelinePoint,
};
pub use snapshot::{RoutingStatus, ViewSnapshot};
