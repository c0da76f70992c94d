// ── Engine → view events ──

use std::sync::Arc;

use crate::model::Report;
use crate::scheduler::RefreshOutcome;

/// Outcome of a command's write, before its follow-up refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded { message: String },
    Failed { message: String },
}

/// Everything the engine tells the view. Delivered in the order the
/// engine produced it.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    Refresh(RefreshOutcome),
    /// A newer valid report arrived; charts should be rebuilt.
    Report(Arc<Report>),
    Command(CommandOutcome),
}
