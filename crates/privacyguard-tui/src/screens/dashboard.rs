//! Dashboard screen: every section stacked vertically in the persisted
//! layout order.
//!
//! One section holds focus at a time. `J`/`K` (or Shift+arrows) move the
//! focused section itself; the new order is persisted immediately. Inside
//! the Interfaces section the arrows pick a row and `Enter` toggles it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use privacyguard_core::render::NO_IP;
use privacyguard_core::{
    ChartName, Command, Direction, InterfaceKind, InterfaceStatus, SectionId, StatusView, Tone,
    ViewContext,
};

use crate::action::Action;
use crate::theme::{self, Palette};
use crate::widgets::charts;

const WAITING: &str = "  Waiting for the first refresh…";
const MAX_INTERFACE_ROWS: usize = 8;
const SERVER_LOG_ROWS: u16 = 6;

#[derive(Debug, Default)]
pub struct DashboardScreen {
    /// Index into the layout order.
    focused: usize,
    selected_interface: usize,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_section(&self, view: &ViewContext) -> Option<SectionId> {
        view.layout().order().get(self.focused).copied()
    }

    /// Name of the highlighted interface row, if the view has any.
    pub fn selected_interface<'a>(&self, view: &'a ViewContext) -> Option<&'a str> {
        view.status()?
            .interfaces
            .get(self.selected_interface)
            .map(|row| row.name.as_str())
    }

    /// Screen-local keys. Global keys are handled by the app first.
    pub fn handle_key_event(&self, key: KeyEvent, view: &ViewContext) -> Option<Action> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('K') => Some(Action::MoveSection(Direction::Up)),
            KeyCode::Char('J') => Some(Action::MoveSection(Direction::Down)),
            KeyCode::Up if shift => Some(Action::MoveSection(Direction::Up)),
            KeyCode::Down if shift => Some(Action::MoveSection(Direction::Down)),
            KeyCode::Tab | KeyCode::Char('j') => Some(Action::FocusSection(Direction::Down)),
            KeyCode::BackTab | KeyCode::Char('k') => Some(Action::FocusSection(Direction::Up)),
            KeyCode::Up | KeyCode::Down => {
                let direction = if key.code == KeyCode::Up {
                    Direction::Up
                } else {
                    Direction::Down
                };
                if self.focused_section(view) == Some(SectionId::Interfaces) {
                    Some(Action::SelectInterface(direction))
                } else {
                    Some(Action::FocusSection(direction))
                }
            }
            KeyCode::Enter => {
                let name = self.selected_interface(view)?;
                view.interface_command(name).map(Action::Execute)
            }
            KeyCode::Char('i') => self
                .selected_interface(view)
                .map(|name| Action::FetchInterfaceDetail(name.to_owned())),
            KeyCode::Char('p') => {
                let name = self.selected_interface(view)?.to_owned();
                Some(Action::Execute(Command::SetPreferredInterface { name }))
            }
            _ => None,
        }
    }

    /// Apply a layout action. Moving a section keeps focus on it.
    pub fn update(&mut self, action: &Action, view: &mut ViewContext) {
        let sections = view.layout().order().len();
        match action {
            Action::FocusSection(Direction::Up) => {
                self.focused = self.focused.checked_sub(1).unwrap_or(sections.saturating_sub(1));
            }
            Action::FocusSection(Direction::Down) => {
                self.focused = if self.focused + 1 >= sections {
                    0
                } else {
                    self.focused + 1
                };
            }
            Action::MoveSection(direction) => {
                if let Some(id) = self.focused_section(view) {
                    if view.move_section(id, *direction) {
                        self.focused = view.layout().position(id).unwrap_or(self.focused);
                    }
                }
            }
            Action::SelectInterface(direction) => {
                let rows = view.status().map_or(0, |s| s.interfaces.len());
                self.selected_interface = match direction {
                    Direction::Up => self.selected_interface.saturating_sub(1),
                    Direction::Down => (self.selected_interface + 1).min(rows.saturating_sub(1)),
                };
            }
            Action::Sync(_) => {
                // The interface list may have shrunk
                let rows = view.status().map_or(0, |s| s.interfaces.len());
                self.selected_interface = self.selected_interface.min(rows.saturating_sub(1));
            }
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, view: &ViewContext, palette: &Palette) {
        let order = view.layout().order();
        let constraints: Vec<Constraint> = order
            .iter()
            .map(|id| section_constraint(*id, view))
            .collect();
        let areas = Layout::vertical(constraints).split(area);

        for (i, (id, section_area)) in order.iter().zip(areas.iter()).enumerate() {
            let block = Block::default()
                .title(format!(" {} ", id.title()))
                .title_style(palette.title())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(palette.border(i == self.focused));
            self.render_section(frame, *section_area, *id, block, view, palette);
        }
    }

    fn render_section(
        &self,
        frame: &mut Frame,
        area: Rect,
        id: SectionId,
        block: Block<'_>,
        view: &ViewContext,
        palette: &Palette,
    ) {
        match id {
            SectionId::Reports => render_reports(frame, area, block, view, palette),
            SectionId::Activity => {
                frame.render_widget(
                    Paragraph::new(activity_lines(view, palette)).block(block),
                    area,
                );
            }
            SectionId::ServerLogs => {
                frame.render_widget(
                    Paragraph::new(server_log_lines(view, palette)).block(block),
                    area,
                );
            }
            _ => {
                let lines = match view.status() {
                    None => vec![Line::from(Span::styled(WAITING, palette.muted()))],
                    Some(status) => match id {
                        SectionId::Network => network_lines(status, palette),
                        SectionId::Privacy => privacy_lines(status, palette),
                        SectionId::Automation => automation_lines(status, palette),
                        _ => self.interface_lines(status, view, palette),
                    },
                };
                frame.render_widget(Paragraph::new(lines).block(block), area);
            }
        }
    }

    fn interface_lines(
        &self,
        status: &StatusView,
        view: &ViewContext,
        palette: &Palette,
    ) -> Vec<Line<'static>> {
        if status.interfaces.is_empty() {
            return vec![Line::from(Span::styled(
                "  No interfaces reported",
                palette.muted(),
            ))];
        }
        let interfaces_focused = self.focused_section(view) == Some(SectionId::Interfaces);
        let mut lines: Vec<Line<'static>> = status
            .interfaces
            .iter()
            .enumerate()
            .take(MAX_INTERFACE_ROWS)
            .map(|(i, row)| {
                let selected = interfaces_focused && i == self.selected_interface;
                let base = if selected {
                    palette.selected()
                } else {
                    palette.text()
                };
                let (state_icon, state_style) = if row.is_up {
                    ("●", palette.tone(Tone::Good))
                } else {
                    ("○", palette.tone(Tone::Bad))
                };
                let address_style = if row.address == NO_IP {
                    palette.muted()
                } else {
                    base
                };
                Line::from(vec![
                    Span::styled(format!("  {} ", kind_icon(row.kind)), palette.muted()),
                    Span::styled(format!("{:<12}", row.name), base),
                    Span::styled(format!("{:<16}", row.address), address_style),
                    Span::styled(format!("{state_icon} "), state_style),
                    Span::styled(format!("[{}]", row.action), palette.key_hint_key()),
                ])
            })
            .collect();

        if let Some(detail) = view.interface_detail() {
            lines.push(detail_line(detail, palette));
        }
        lines
    }
}

fn section_constraint(id: SectionId, view: &ViewContext) -> Constraint {
    match id {
        SectionId::Network => Constraint::Length(4),
        SectionId::Privacy | SectionId::Automation => Constraint::Length(5),
        SectionId::Interfaces => {
            let rows = view
                .status()
                .map_or(1, |s| s.interfaces.len().clamp(1, MAX_INTERFACE_ROWS));
            let detail = usize::from(view.interface_detail().is_some());
            Constraint::Length(u16::try_from(rows + detail + 2).unwrap_or(u16::MAX))
        }
        SectionId::Reports => Constraint::Length(14),
        SectionId::Activity => Constraint::Min(5),
        SectionId::ServerLogs => Constraint::Length(SERVER_LOG_ROWS + 2),
    }
}

fn kind_icon(kind: InterfaceKind) -> &'static str {
    match kind {
        InterfaceKind::Wired => "⌁",
        InterfaceKind::Wireless => "≋",
    }
}

fn label(text: &str, palette: &Palette) -> Span<'static> {
    Span::styled(format!("  {text:<18}"), palette.muted())
}

fn network_lines(status: &StatusView, palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            label("Current interface", palette),
            Span::styled(status.current_interface.clone(), palette.text()),
        ]),
        Line::from(vec![
            label("IP address", palette),
            Span::styled(status.ip_address.clone(), palette.text()),
        ]),
    ]
}

fn privacy_lines(status: &StatusView, palette: &Palette) -> Vec<Line<'static>> {
    status
        .privacy
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Line::from(vec![
                label(&row.feature.to_string(), palette),
                Span::styled(format!("{:<10}", row.badge.label), palette.tone(row.badge.tone)),
                Span::styled(format!("{} ", i + 1), palette.key_hint_key()),
                Span::styled("toggle", palette.key_hint()),
            ])
        })
        .collect()
}

fn automation_lines(status: &StatusView, palette: &Palette) -> Vec<Line<'static>> {
    let automation = &status.automation;
    vec![
        Line::from(vec![
            label("Status", palette),
            Span::styled(automation.badge.label, palette.tone(automation.badge.tone)),
        ]),
        Line::from(vec![
            label("Active rules", palette),
            Span::styled(automation.active_rules.to_string(), palette.text()),
        ]),
        Line::from(vec![
            label("Last check", palette),
            Span::styled(
                automation.last_check.clone().unwrap_or_else(|| "Never".into()),
                palette.text(),
            ),
        ]),
    ]
}

fn detail_line(detail: &InterfaceStatus, palette: &Palette) -> Line<'static> {
    let address = detail
        .ipv4
        .map_or_else(|| NO_IP.to_owned(), |ip| ip.to_string());
    let state = if detail.is_up { "up" } else { "down" };
    Line::from(vec![
        Span::styled("  ▸ ", palette.key_hint_key()),
        Span::styled(
            format!("{} ({}) is {state}, {address}", detail.name, detail.kind),
            palette.text(),
        ),
    ])
}

fn render_reports(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    view: &ViewContext,
    palette: &Palette,
) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(inner);
    let summary = view.charts().summary().unwrap_or_default();
    let counters = Line::from(vec![
        Span::styled("  Network events ", palette.muted()),
        Span::styled(summary.network.to_string(), palette.title()),
        Span::styled("   Privacy events ", palette.muted()),
        Span::styled(summary.privacy.to_string(), palette.title()),
        Span::styled("   Automation events ", palette.muted()),
        Span::styled(summary.automation.to_string(), palette.title()),
    ]);
    frame.render_widget(Paragraph::new(counters), rows[0]);

    let cols = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
    ])
    .split(rows[1]);

    let chart_block = |title: &'static str| {
        Block::default()
            .title(title)
            .title_style(palette.muted())
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(palette.border(false))
    };
    let registry = view.charts();
    charts::render_timeline(
        frame,
        cols[0],
        registry.slot(ChartName::NetworkActivity),
        chart_block(" Network activity "),
        palette,
    );
    charts::render_distribution(
        frame,
        cols[1],
        registry.slot(ChartName::PrivacyUsage),
        chart_block(" Privacy usage "),
        palette,
    );
    charts::render_rules(
        frame,
        cols[2],
        registry.slot(ChartName::AutomationRules),
        chart_block(" Rule executions "),
        palette,
    );
}

fn activity_lines(view: &ViewContext, palette: &Palette) -> Vec<Line<'static>> {
    if view.feedback().log_len() == 0 {
        return vec![Line::from(Span::styled("  No activity yet", palette.muted()))];
    }
    view.feedback()
        .log()
        .map(|entry| {
            let color = palette.severity_color(entry.severity);
            Line::from(vec![
                Span::styled(
                    format!("  {} ", entry.timestamp.format("%H:%M:%S")),
                    palette.muted(),
                ),
                Span::styled(
                    format!("{} ", theme::severity_icon(entry.severity)),
                    ratatui::style::Style::default().fg(color),
                ),
                Span::styled(entry.message.clone(), palette.text()),
            ])
        })
        .collect()
}

fn server_log_lines(view: &ViewContext, palette: &Palette) -> Vec<Line<'static>> {
    if view.server_logs().is_empty() {
        return vec![Line::from(vec![
            Span::styled("  Press ", palette.muted()),
            Span::styled("l", palette.key_hint_key()),
            Span::styled(" to load server logs", palette.muted()),
        ])];
    }
    view.server_logs()
        .iter()
        .take(usize::from(SERVER_LOG_ROWS))
        .map(|line| Line::from(Span::styled(format!("  {line}"), palette.text())))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use chrono::Local;
    use pretty_assertions::assert_eq;

    use privacyguard_core::{
        AutomationStatus, DashboardConfig, MemoryStore, PrivacyConfig, RefreshOutcome,
        RoutingStatus, SyncEvent, ViewSnapshot,
    };

    use super::*;

    fn view_with(interfaces: &[(&str, bool)]) -> ViewContext {
        let config = DashboardConfig::new("http://localhost:8001/api".parse().unwrap());
        let mut view = ViewContext::new(Box::new(MemoryStore::new()), &config, None);
        let snapshot = ViewSnapshot {
            interfaces: interfaces
                .iter()
                .map(|(name, up)| InterfaceStatus {
                    name: (*name).into(),
                    kind: InterfaceKind::Wired,
                    is_up: *up,
                    ipv4: None,
                })
                .collect(),
            routing: RoutingStatus::default(),
            privacy: PrivacyConfig::default(),
            automation: AutomationStatus::default(),
            taken_at: Local::now(),
        };
        view.apply(
            SyncEvent::Refresh(RefreshOutcome::Published {
                generation: 1,
                snapshot: Arc::new(snapshot),
            }),
            Instant::now(),
        );
        view
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn focus_wraps_around() {
        let mut view = view_with(&[]);
        let mut screen = DashboardScreen::new();
        screen.update(&Action::FocusSection(Direction::Up), &mut view);
        assert_eq!(screen.focused_section(&view), Some(SectionId::ServerLogs));
        screen.update(&Action::FocusSection(Direction::Down), &mut view);
        assert_eq!(screen.focused_section(&view), Some(SectionId::Network));
    }

    #[test]
    fn moving_focused_section_keeps_focus() {
        let mut view = view_with(&[]);
        let mut screen = DashboardScreen::new();
        screen.update(&Action::MoveSection(Direction::Down), &mut view);
        assert_eq!(
            &view.layout().order()[..2],
            &[SectionId::Privacy, SectionId::Network]
        );
        assert_eq!(screen.focused_section(&view), Some(SectionId::Network));

        // Already at the top after moving back up twice
        screen.update(&Action::MoveSection(Direction::Up), &mut view);
        screen.update(&Action::MoveSection(Direction::Up), &mut view);
        assert_eq!(view.layout().order()[0], SectionId::Network);
    }

    #[test]
    fn enter_toggles_selected_interface() {
        let mut view = view_with(&[("eth0", true), ("wlan0", false)]);
        let mut screen = DashboardScreen::new();
        while screen.focused_section(&view) != Some(SectionId::Interfaces) {
            screen.update(&Action::FocusSection(Direction::Down), &mut view);
        }

        let action = screen.handle_key_event(key(KeyCode::Down), &view).unwrap();
        assert!(matches!(action, Action::SelectInterface(Direction::Down)));
        screen.update(&action, &mut view);

        let Some(Action::Execute(cmd)) = screen.handle_key_event(key(KeyCode::Enter), &view) else {
            panic!("expected a command");
        };
        assert_eq!(
            cmd,
            Command::ToggleInterface {
                name: "wlan0".into(),
                enable: true
            }
        );
    }

    #[test]
    fn interface_keys_need_a_status() {
        let config = DashboardConfig::new("http://localhost:8001/api".parse().unwrap());
        let view = ViewContext::new(Box::new(MemoryStore::new()), &config, None);
        let screen = DashboardScreen::new();
        assert!(screen.handle_key_event(key(KeyCode::Enter), &view).is_none());
        assert!(screen.handle_key_event(key(KeyCode::Char('p')), &view).is_none());
    }

    #[test]
    fn shift_arrows_move_sections() {
        let view = view_with(&[]);
        let screen = DashboardScreen::new();
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert!(matches!(
            screen.handle_key_event(up, &view),
            Some(Action::MoveSection(Direction::Up))
        ));
        let down = KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT);
        assert!(matches!(
            screen.handle_key_event(down, &view),
            Some(Action::MoveSection(Direction::Down))
        ));
    }
}
