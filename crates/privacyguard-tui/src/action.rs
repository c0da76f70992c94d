//! All possible UI actions. Actions are the sole mechanism for state mutation.

use privacyguard_core::{Command, Direction, InterfaceStatus, RefreshState, Severity, SyncEvent};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Engine (from the data bridge) ─────────────────────────────
    Sync(SyncEvent),
    RefreshStateChanged(RefreshState),
    ServerLogsLoaded(Vec<String>),
    InterfaceDetailLoaded(InterfaceStatus),
    Notify(String, Severity),
    /// The settings write succeeded; carries the submitted check interval.
    SettingsSaved(Option<u64>),

    // ── Requests to the engine ────────────────────────────────────
    RequestRefresh,
    Execute(Command),
    FetchServerLogs,
    FetchInterfaceDetail(String),

    // ── Layout ────────────────────────────────────────────────────
    FocusSection(Direction),
    MoveSection(Direction),
    SelectInterface(Direction),

    // ── View preferences ──────────────────────────────────────────
    ToggleTheme,
    ClearLog,
    ToggleHelp,
    OpenSettings,
    CloseSettings,
}
