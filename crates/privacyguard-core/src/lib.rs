//! State synchronisation and view engine for the PrivacyGuard dashboard.
//!
//! This crate sits between `privacyguard-api` and the terminal UI:
//!
//! - **[`Dashboard`]**: network-side context. Runs refresh cycles (four
//!   status reads fanned out concurrently, all-or-nothing, plus an
//!   independent report read) on a timer and on demand, routes
//!   [`Command`]s through a processor task, and reports everything as
//!   [`SyncEvent`]s. Overlapping cycles are allowed; a generation gate
//!   keeps an older cycle from overwriting a newer one.
//!
//! - **[`ViewContext`]**: view-side context. Folds `SyncEvent`s into a
//!   [`StatusView`], the [`ChartRegistry`] and the [`FeedbackChannel`],
//!   and owns the persisted [`DashboardLayout`] and [`ThemePreference`].
//!
//! - **Domain model** ([`model`]): canonical snapshot types converted from
//!   the wire format in [`convert`].

pub mod charts;
pub mod command;
pub mod config;
pub mod context;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod feedback;
pub mod layout;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod theme;

// ── Primary re-exports ──────────────────────────────────────────────
pub use charts::{ChartData, ChartInstance, ChartName, ChartRegistry, ChartSlot, SummaryCounters};
pub use command::{AutomationUpdate, Command, CommandResult, ConfigUpdate};
pub use config::DashboardConfig;
pub use context::ViewContext;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use event::{CommandOutcome, SyncEvent};
pub use feedback::{FeedbackChannel, LogEntry, Severity, Toast, ToastPhase};
pub use layout::{DashboardLayout, Direction, SectionId};
pub use render::{StatusView, Tone, ToggleAction};
pub use scheduler::{RefreshOutcome, RefreshState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use theme::ThemePreference;

pub use model::{
    AutomationStatus, InterfaceKind, InterfaceStatus, PrivacyConfig, PrivacyFeature, Report,
    RoutingStatus, ViewSnapshot,
};
