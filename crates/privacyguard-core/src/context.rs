// ── View context ──
//
// The single owner of view state: status projection, chart registry,
// feedback surfaces, section layout and theme, plus the local store they
// persist to. Constructed once at startup and mutated only by the UI loop,
// which feeds it `SyncEvent`s from the engine.

use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::charts::ChartRegistry;
use crate::command::Command;
use crate::config::DashboardConfig;
use crate::event::{CommandOutcome, SyncEvent};
use crate::feedback::{FeedbackChannel, Severity};
use crate::layout::{DashboardLayout, Direction, SectionId};
use crate::model::{InterfaceStatus, PrivacyFeature};
use crate::render::StatusView;
use crate::scheduler::RefreshOutcome;
use crate::storage::KeyValueStore;
use crate::theme::ThemePreference;

pub const REFRESH_SUCCEEDED: &str = "Dashboard refreshed successfully";

pub struct ViewContext {
    status: Option<StatusView>,
    last_refreshed: Option<DateTime<Local>>,
    charts: ChartRegistry,
    feedback: FeedbackChannel,
    layout: DashboardLayout,
    theme: ThemePreference,
    store: Box<dyn KeyValueStore>,
    server_logs: Vec<String>,
    interface_detail: Option<InterfaceStatus>,
}

impl ViewContext {
    /// Restore layout and theme from `store`, falling back to `ambient`
    /// for the theme on first run.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        config: &DashboardConfig,
        ambient: Option<ThemePreference>,
    ) -> Self {
        let mut layout = DashboardLayout::default();
        layout.restore_order(&*store);
        let theme = ThemePreference::load(&*store, ambient);

        Self {
            status: None,
            last_refreshed: None,
            charts: ChartRegistry::new(),
            feedback: FeedbackChannel::new(config.toast_duration, config.fade_duration),
            layout,
            theme,
            store,
            server_logs: Vec::new(),
            interface_detail: None,
        }
    }

    /// Fold one engine event into view state.
    pub fn apply(&mut self, event: SyncEvent, now: Instant) {
        match event {
            SyncEvent::Refresh(RefreshOutcome::Published { snapshot, .. }) => {
                self.status = Some(StatusView::project(&snapshot));
                self.last_refreshed = Some(snapshot.taken_at);
                self.feedback.notify(REFRESH_SUCCEEDED, Severity::Success, now);
            }
            SyncEvent::Refresh(RefreshOutcome::Failed { message, .. }) => {
                self.feedback.notify(
                    format!("Failed to refresh dashboard: {message}"),
                    Severity::Error,
                    now,
                );
            }
            SyncEvent::Refresh(RefreshOutcome::Superseded { generation }) => {
                debug!(generation, "discarding superseded refresh");
            }
            SyncEvent::Report(report) => self.charts.rebuild(&report),
            SyncEvent::Command(CommandOutcome::Succeeded { message }) => {
                self.feedback.notify(message, Severity::Success, now);
            }
            SyncEvent::Command(CommandOutcome::Failed { message }) => {
                self.feedback.notify(message, Severity::Error, now);
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn status(&self) -> Option<&StatusView> {
        self.status.as_ref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn feedback(&self) -> &FeedbackChannel {
        &self.feedback
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn server_logs(&self) -> &[String] {
        &self.server_logs
    }

    pub fn interface_detail(&self) -> Option<&InterfaceStatus> {
        self.interface_detail.as_ref()
    }

    // ── Mutations ────────────────────────────────────────────────

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.feedback.notify(message, severity, now);
    }

    pub fn clear_log(&mut self, now: Instant) {
        self.feedback.clear(now);
    }

    /// Expire finished toasts. Returns `true` if anything was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.tick(now) > 0
    }

    /// Move a section and persist the new order.
    pub fn move_section(&mut self, id: SectionId, direction: Direction) -> bool {
        if !self.layout.move_section(id, direction) {
            return false;
        }
        self.layout.save_order(&mut *self.store);
        true
    }

    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme = self.theme.toggled();
        self.theme.persist(&mut *self.store);
        self.theme
    }

    pub fn set_server_logs(&mut self, logs: Vec<String>) {
        self.server_logs = logs;
    }

    pub fn set_interface_detail(&mut self, detail: InterfaceStatus) {
        self.interface_detail = Some(detail);
    }

    /// Dispose every chart instance, e.g. on shutdown.
    pub fn dispose_charts(&mut self) {
        self.charts.dispose_all();
    }

    // ── Command builders ─────────────────────────────────────────

    /// The command behind an interface row's toggle control, using the
    /// action computed for the current view.
    pub fn interface_command(&self, name: &str) -> Option<Command> {
        let row = self.status.as_ref()?.interface(name)?;
        Some(Command::ToggleInterface {
            name: row.name.clone(),
            enable: row.action.enables(),
        })
    }

    /// Flip a privacy feature relative to the current view.
    pub fn privacy_command(&self, feature: PrivacyFeature) -> Option<Command> {
        let row = self.status.as_ref()?.privacy_row(feature)?;
        Some(Command::SetPrivacyFeature {
            feature,
            enabled: !row.enabled,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::feedback::LogEntry;
    use crate::layout::SECTION_ORDER_KEY;
    use crate::model::{
        AutomationStatus, InterfaceKind, PrivacyConfig, RoutingStatus, ViewSnapshot,
    };
    use crate::storage::MemoryStore;

    fn config() -> DashboardConfig {
        DashboardConfig::new(Url::parse("http://localhost:8001/api").unwrap())
    }

    fn context() -> ViewContext {
        ViewContext::new(Box::new(MemoryStore::new()), &config(), None)
    }

    fn snapshot(eth0_up: bool) -> Arc<ViewSnapshot> {
        Arc::new(ViewSnapshot {
            interfaces: vec![InterfaceStatus {
                name: "eth0".into(),
                kind: InterfaceKind::Wired,
                is_up: eth0_up,
                ipv4: None,
            }],
            routing: RoutingStatus {
                preferred_interface: Some("eth0".into()),
                ip_address: Some("10.0.0.2".into()),
            },
            privacy: PrivacyConfig::default(),
            automation: AutomationStatus::default(),
            taken_at: Local::now(),
        })
    }

    fn messages(ctx: &ViewContext) -> Vec<&str> {
        ctx.feedback().log().map(|e: &LogEntry| e.message.as_str()).collect()
    }

    #[test]
    fn failed_refresh_leaves_view_untouched() {
        let now = Instant::now();
        let mut ctx = context();
        ctx.apply(
            SyncEvent::Refresh(RefreshOutcome::Published {
                generation: 1,
                snapshot: snapshot(true),
            }),
            now,
        );
        let before = ctx.status().cloned();

        ctx.apply(
            SyncEvent::Refresh(RefreshOutcome::Failed {
                generation: 2,
                message: "/routing: HTTP 500: down".into(),
            }),
            now,
        );

        assert_eq!(ctx.status().cloned(), before);
        assert_eq!(
            messages(&ctx),
            vec![
                "Failed to refresh dashboard: /routing: HTTP 500: down",
                REFRESH_SUCCEEDED
            ]
        );
    }

    #[test]
    fn superseded_refresh_is_silent() {
        let mut ctx = context();
        ctx.apply(
            SyncEvent::Refresh(RefreshOutcome::Superseded { generation: 1 }),
            Instant::now(),
        );
        assert_eq!(ctx.feedback().log_len(), 0);
        assert!(ctx.status().is_none());
    }

    #[test]
    fn interface_command_uses_rendered_action() {
        let mut ctx = context();
        assert!(ctx.interface_command("eth0").is_none());

        ctx.apply(
            SyncEvent::Refresh(RefreshOutcome::Published {
                generation: 1,
                snapshot: snapshot(false),
            }),
            Instant::now(),
        );
        assert_eq!(
            ctx.interface_command("eth0"),
            Some(Command::ToggleInterface {
                name: "eth0".into(),
                enable: true
            })
        );
        assert_eq!(
            ctx.privacy_command(PrivacyFeature::Tor),
            Some(Command::SetPrivacyFeature {
                feature: PrivacyFeature::Tor,
                enabled: true
            })
        );
    }

    #[test]
    fn moving_a_section_persists_order() {
        let mut store = MemoryStore::new();
        store
            .set(SECTION_ORDER_KEY, r#"["network"]"#)
            .unwrap();
        let mut ctx = ViewContext::new(Box::new(store), &config(), None);
        assert_eq!(ctx.layout().order().last(), Some(&SectionId::Network));

        assert!(ctx.move_section(SectionId::Network, Direction::Up));
        let order = ctx.layout().order().to_vec();
        assert_eq!(order[order.len() - 2], SectionId::Network);
    }

    #[test]
    fn theme_toggle_round_trips_through_store() {
        let mut ctx = ViewContext::new(
            Box::new(MemoryStore::new()),
            &config(),
            Some(ThemePreference::Light),
        );
        assert_eq!(ctx.theme(), ThemePreference::Light);
        assert_eq!(ctx.toggle_theme(), ThemePreference::Dark);
    }

    #[test]
    fn command_outcomes_reach_both_surfaces() {
        let now = Instant::now();
        let mut ctx = context();
        ctx.apply(
            SyncEvent::Command(CommandOutcome::Failed {
                message: "Failed to enable eth0: HTTP 500: boom".into(),
            }),
            now,
        );
        assert_eq!(messages(&ctx), vec!["Failed to enable eth0: HTTP 500: boom"]);
        let toast = ctx.feedback().toasts(now).next().map(|(t, _)| t.message.clone());
        assert_eq!(toast.as_deref(), Some("Failed to enable eth0: HTTP 500: boom"));
    }
}
