//! Application core: event loop, key mapping, action dispatch.
//!
//! The [`ViewContext`] lives here and is only ever touched from this loop.
//! Network work is handed to the [`Dashboard`] engine on spawned tasks whose
//! results come back as actions.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use privacyguard_core::{
    Command, CoreError, Dashboard, PrivacyFeature, RefreshState, Severity, SyncEvent, ViewContext,
};

use crate::action::Action;
use crate::event::{Clock, Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::screens::settings::{DEFAULT_CHECK_INTERVAL, SettingsForm};
use crate::theme::Palette;
use crate::tui::{self, Tui};
use crate::widgets::toast;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    /// Handed to the data bridge when the loop starts.
    events: Option<mpsc::UnboundedReceiver<SyncEvent>>,
    view: ViewContext,
    screen: DashboardScreen,
    /// Open settings modal; blocks other input while present.
    settings: Option<SettingsForm>,
    /// Last check interval submitted from the settings modal.
    check_interval: u64,
    refresh_state: RefreshState,
    running: bool,
    help_visible: bool,
    throbber_state: ThrobberState,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(
        dashboard: Dashboard,
        events: mpsc::UnboundedReceiver<SyncEvent>,
        view: ViewContext,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            events: Some(events),
            view,
            screen: DashboardScreen::new(),
            settings: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
            refresh_state: RefreshState::Idle,
            running: true,
            help_visible: false,
            throbber_state: ThrobberState::default(),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let title = tui::window_title(self.dashboard.config().api_url.host_str());
        let mut tui = Tui::enter(&title)?;

        if let Some(events) = self.events.take() {
            tokio::spawn(crate::data_bridge::spawn_data_bridge(
                self.dashboard.clone(),
                events,
                self.action_tx.clone(),
                self.data_cancel.clone(),
            ));
        }

        let mut events = EventReader::new(Clock::for_fade(self.dashboard.config().fade_duration));

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        drop(tui);
        self.view.dispose_charts();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. Modal input comes first, then global keys,
    /// then the dashboard screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if let Some(form) = &mut self.settings {
            return form.handle_key_event(key);
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                Some(Action::Quit)
            }
            (_, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Action::RequestRefresh),
            (KeyModifiers::NONE, KeyCode::Char('t')) => Some(Action::ToggleTheme),
            (KeyModifiers::NONE, KeyCode::Char('s')) => Some(Action::OpenSettings),
            (KeyModifiers::NONE, KeyCode::Char('l')) => Some(Action::FetchServerLogs),
            (KeyModifiers::NONE, KeyCode::Char('c')) => Some(Action::ClearLog),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let feature = match c {
                    '1' => PrivacyFeature::Vpn,
                    '2' => PrivacyFeature::Proxy,
                    _ => PrivacyFeature::Tor,
                };
                self.view.privacy_command(feature).map(Action::Execute)
            }
            _ => self.screen.handle_key_event(key, &self.view),
        }
    }

    /// Apply one action to app state.
    fn process_action(&mut self, action: &Action) {
        let now = Instant::now();
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                self.view.tick(now);
                if self.refresh_state == RefreshState::Refreshing {
                    self.throbber_state.calc_next();
                }
            }

            Action::Render | Action::Resize(..) => {}

            Action::Sync(event) => {
                self.view.apply(event.clone(), now);
                self.screen.update(action, &mut self.view);
            }

            Action::RefreshStateChanged(state) => self.refresh_state = *state,

            Action::ServerLogsLoaded(logs) => self.view.set_server_logs(logs.clone()),

            Action::InterfaceDetailLoaded(detail) => {
                self.view.set_interface_detail(detail.clone());
            }

            Action::Notify(message, severity) => {
                self.view.notify(message.clone(), *severity, now);
            }

            Action::RequestRefresh => {
                debug!("manual refresh requested");
                self.dashboard.trigger_refresh();
            }

            // The settings modal stays open until the write is confirmed
            Action::Execute(cmd) => self.execute_command(cmd.clone()),

            Action::SettingsSaved(check_interval) => {
                if let Some(secs) = check_interval {
                    self.check_interval = *secs;
                }
                self.settings = None;
            }

            Action::FetchServerLogs => self.fetch_server_logs(),

            Action::FetchInterfaceDetail(name) => self.fetch_interface_detail(name.clone()),

            Action::FocusSection(_) | Action::MoveSection(_) | Action::SelectInterface(_) => {
                self.screen.update(action, &mut self.view);
            }

            Action::ToggleTheme => {
                let theme = self.view.toggle_theme();
                debug!(%theme, "theme switched");
            }

            Action::ClearLog => self.view.clear_log(now),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSettings => {
                self.settings = Some(SettingsForm::new(self.view.status(), self.check_interval));
            }

            Action::CloseSettings => self.settings = None,
        }
    }

    // ── Engine requests ──────────────────────────────────────────────

    /// Run a command on the engine. Its outcome is reported through the
    /// engine's event stream; only a stopped engine is reported here. A
    /// successful settings write closes the modal.
    fn execute_command(&self, cmd: Command) {
        let dashboard = self.dashboard.clone();
        let tx = self.action_tx.clone();
        let saved_interval = match &cmd {
            Command::SaveConfig(update) => Some(update.automation.map(|a| a.check_interval)),
            _ => None,
        };
        tokio::spawn(async move {
            match dashboard.execute(cmd).await {
                Ok(result) => {
                    debug!(message = %result.message, "command completed");
                    if let Some(interval) = saved_interval {
                        let _ = tx.send(Action::SettingsSaved(interval));
                    }
                }
                Err(CoreError::Disconnected) => {
                    let _ = tx.send(Action::Notify(
                        "Dashboard engine is not running".into(),
                        Severity::Error,
                    ));
                }
                Err(e) => debug!(error = %e, "command failed"),
            }
        });
    }

    fn fetch_server_logs(&self) {
        let dashboard = self.dashboard.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match dashboard.fetch_server_logs().await {
                Ok(logs) => Action::ServerLogsLoaded(logs),
                Err(e) => Action::Notify(format!("Failed to load server logs: {e}"), Severity::Error),
            };
            let _ = tx.send(action);
        });
    }

    fn fetch_interface_detail(&self, name: String) {
        let dashboard = self.dashboard.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match dashboard.interface_status(&name).await {
                Ok(detail) => Action::InterfaceDetailLoaded(detail),
                Err(e) => Action::Notify(
                    format!("Failed to load status of {name}: {e}"),
                    Severity::Error,
                ),
            };
            let _ = tx.send(action);
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = Palette::for_theme(self.view.theme());

        frame.render_widget(Block::default().style(palette.base()), area);

        let layout = Layout::vertical([
            Constraint::Length(1), // Title bar
            Constraint::Min(1),    // Sections
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_title_bar(frame, layout[0], &palette);
        self.screen.render(frame, layout[1], &self.view, &palette);
        self.render_status_bar(frame, layout[2], &palette);

        if let Some(form) = &self.settings {
            form.render(frame, area, &palette);
        }
        if self.help_visible {
            render_help_overlay(frame, area, &palette);
        }

        toast::render_toasts(frame, layout[1], self.view.feedback(), &palette, Instant::now());
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let line = Line::from(vec![
            Span::styled(" PrivacyGuard ", palette.title()),
            Span::styled(
                format!("│ {} ", self.dashboard.client().base_url()),
                palette.muted(),
            ),
            Span::styled(format!("│ {} theme", self.view.theme()), palette.muted()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let cols = Layout::horizontal([Constraint::Length(16), Constraint::Min(0)]).split(area);

        match self.refresh_state {
            RefreshState::Refreshing => {
                let throbber = Throbber::default()
                    .label("refreshing")
                    .style(palette.text())
                    .throbber_style(Style::default().fg(palette.highlight));
                frame.render_stateful_widget(throbber, cols[0], &mut self.throbber_state.clone());
            }
            RefreshState::Idle => {
                frame.render_widget(
                    Paragraph::new(Span::styled(" ● idle", Style::default().fg(palette.good))),
                    cols[0],
                );
            }
        }

        let line = Line::from(vec![
            Span::styled(
                refreshed_label(self.view.last_refreshed(), Local::now()),
                palette.muted(),
            ),
            Span::styled(" │ ", palette.muted()),
            Span::styled("r ", palette.key_hint_key()),
            Span::styled("refresh  ", palette.key_hint()),
            Span::styled("s ", palette.key_hint_key()),
            Span::styled("settings  ", palette.key_hint()),
            Span::styled("? ", palette.key_hint_key()),
            Span::styled("help  ", palette.key_hint()),
            Span::styled("q ", palette.key_hint_key()),
            Span::styled("quit", palette.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), cols[1]);
    }
}

/// "updated 12s ago", rounded to whole seconds.
fn refreshed_label(last: Option<DateTime<Local>>, now: DateTime<Local>) -> String {
    let Some(last) = last else {
        return "not refreshed yet".into();
    };
    let age = now.signed_duration_since(last).to_std().unwrap_or_default();
    let age = Duration::from_secs(age.as_secs());
    if age.is_zero() {
        "updated just now".into()
    } else {
        format!("updated {} ago", humantime::format_duration(age))
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 20u16.min(area.height.saturating_sub(4));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(palette.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border(true))
        .style(Style::default().bg(palette.bg));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<12}"), palette.key_hint_key()),
            Span::styled(what, palette.key_hint()),
        ])
    };
    let heading = |text: &'static str| Line::from(Span::styled(format!("  {text}"), palette.title()));

    let lines = vec![
        Line::from(""),
        heading("Sections"),
        entry("j/k Tab", "Focus next / previous section"),
        entry("J/K S-↑/↓", "Move focused section"),
        entry("↑/↓", "Pick interface (Interfaces)"),
        entry("Enter", "Enable / disable interface"),
        entry("i", "Interface details"),
        entry("p", "Prefer interface for routing"),
        Line::from(""),
        heading("Dashboard"),
        entry("1 2 3", "Toggle VPN / Proxy / Tor"),
        entry("r", "Refresh now"),
        entry("s", "Settings"),
        entry("l", "Load server logs"),
        entry("c", "Clear activity log"),
        entry("t", "Switch light / dark theme"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", palette.key_hint())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use privacyguard_core::{AutomationUpdate, ConfigUpdate, DashboardConfig, MemoryStore};

    use super::*;

    fn app() -> App {
        let config = DashboardConfig::new("http://localhost:8001/api".parse().unwrap());
        let (dashboard, events) = Dashboard::new(config.clone()).unwrap();
        let view = ViewContext::new(Box::new(MemoryStore::new()), &config, None);
        App::new(dashboard, events, view)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn global_keys() {
        let mut app = app();
        assert!(matches!(app.handle_key_event(key(KeyCode::Char('q'))), Some(Action::Quit)));
        assert!(matches!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        ));
        assert!(matches!(app.handle_key_event(key(KeyCode::Char('c'))), Some(Action::ClearLog)));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('r'))),
            Some(Action::RequestRefresh)
        ));
    }

    #[test]
    fn privacy_keys_wait_for_status() {
        let mut app = app();
        assert!(app.handle_key_event(key(KeyCode::Char('1'))).is_none());
    }

    #[test]
    fn settings_modal_captures_input() {
        let mut app = app();
        app.process_action(&Action::OpenSettings);
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).is_none());
        let close = app.handle_key_event(key(KeyCode::Esc)).unwrap();
        app.process_action(&close);
        assert!(app.settings.is_none());
    }

    #[tokio::test]
    async fn failed_save_keeps_settings_open() {
        let mut app = app();
        app.process_action(&Action::OpenSettings);

        let update = ConfigUpdate {
            automation: Some(AutomationUpdate {
                enabled: true,
                check_interval: 999,
            }),
            ..ConfigUpdate::default()
        };
        app.process_action(&Action::Execute(Command::SaveConfig(update)));
        assert!(app.settings.is_some());

        // The engine was never started, so the write is refused
        let reply = app.action_rx.recv().await.unwrap();
        assert!(matches!(reply, Action::Notify(_, Severity::Error)));
        app.process_action(&reply);

        assert!(app.settings.is_some());
        assert_eq!(app.check_interval, DEFAULT_CHECK_INTERVAL);
    }

    #[test]
    fn confirmed_save_closes_settings() {
        let mut app = app();
        app.process_action(&Action::OpenSettings);
        app.process_action(&Action::SettingsSaved(Some(120)));
        assert!(app.settings.is_none());
        assert_eq!(app.check_interval, 120);

        app.process_action(&Action::OpenSettings);
        app.process_action(&Action::SettingsSaved(None));
        assert!(app.settings.is_none());
        assert_eq!(app.check_interval, 120);
    }

    #[test]
    fn clear_log_records_itself() {
        let mut app = app();
        app.process_action(&Action::Notify("one".into(), Severity::Info));
        app.process_action(&Action::ClearLog);
        let log: Vec<&str> = app.view.feedback().log().map(|e| e.message.as_str()).collect();
        assert_eq!(log, vec!["Logs cleared"]);
    }

    #[test]
    fn refreshed_label_formats_age() {
        let now = Local::now();
        assert_eq!(refreshed_label(None, now), "not refreshed yet");
        assert_eq!(refreshed_label(Some(now), now), "updated just now");
        let earlier = now - chrono::Duration::seconds(75);
        assert_eq!(refreshed_label(Some(earlier), now), "updated 1m 15s ago");
    }
}
