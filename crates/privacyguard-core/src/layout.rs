// ── Dashboard layout persistence ──
//
// Section order is owned entirely by the client. Restoring uses append
// semantics: each stored id is moved to the end in stored order, so
// sections the stored list does not mention drift to the front while
// keeping their relative order. Unknown ids are ignored. A missing or
// malformed stored value leaves the layout as it is.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

use crate::storage::KeyValueStore;

pub const SECTION_ORDER_KEY: &str = "dashboard.section-order";

/// A reorderable dashboard section.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Network,
    Privacy,
    Automation,
    Interfaces,
    Reports,
    Activity,
    ServerLogs,
}

impl SectionId {
    pub fn title(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Privacy => "Privacy Tools",
            Self::Automation => "Automation",
            Self::Interfaces => "Interfaces",
            Self::Reports => "Reports",
            Self::Activity => "Activity Log",
            Self::ServerLogs => "Server Logs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered list of the sections present on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    order: Vec<SectionId>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            order: SectionId::iter().collect(),
        }
    }
}

impl DashboardLayout {
    pub fn new(order: Vec<SectionId>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[SectionId] {
        &self.order
    }

    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.order.iter().position(|s| *s == id)
    }

    /// Swap `id` with its neighbour. Returns `false` at either edge.
    pub fn move_section(&mut self, id: SectionId, direction: Direction) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let target = match direction {
            Direction::Up if pos > 0 => pos - 1,
            Direction::Down if pos + 1 < self.order.len() => pos + 1,
            _ => return false,
        };
        self.order.swap(pos, target);
        true
    }

    /// Write the current order as a JSON array of ids. Failures are logged
    /// and swallowed.
    pub fn save_order(&self, store: &mut dyn KeyValueStore) {
        let ids: Vec<String> = self.order.iter().map(ToString::to_string).collect();
        let encoded = match serde_json::to_string(&ids) {
            Ok(encoded) => encoded,
            Err(e) => {
                debug!(error = %e, "could not encode section order");
                return;
            }
        };
        if let Err(e) = store.set(SECTION_ORDER_KEY, &encoded) {
            debug!(error = %e, "could not persist section order");
        }
    }

    /// Apply the stored order, if any, over the current one.
    pub fn restore_order(&mut self, store: &dyn KeyValueStore) {
        let raw = match store.get(SECTION_ORDER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "could not read section order");
                return;
            }
        };
        let Ok(ids) = serde_json::from_str::<Vec<String>>(&raw) else {
            debug!(raw = %raw, "ignoring malformed section order");
            return;
        };
        let listed: Vec<SectionId> = ids
            .iter()
            .filter_map(|id| SectionId::from_str(id).ok())
            .collect();
        self.order = append_in_order(&self.order, &listed);
    }
}

/// Move each item of `listed` that appears in `current` to the end, in
/// listed order. Items not in `current` are ignored.
pub fn append_in_order<T: PartialEq + Clone>(current: &[T], listed: &[T]) -> Vec<T> {
    let mut order = current.to_vec();
    for id in listed {
        if let Some(pos) = order.iter().position(|x| x == id) {
            let item = order.remove(pos);
            order.push(item);
        }
    }
    order
}
