//! Settings modal: privacy feature switches plus automation settings.
//!
//! Opened with `s`. `Tab`/arrows move between fields, `Space` flips a
//! switch, digits edit the check interval, `Enter` saves everything in one
//! write and `Esc` closes without saving.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tui_input::{Input, InputRequest};

use privacyguard_core::{
    AutomationUpdate, Command, ConfigUpdate, PrivacyFeature, StatusView, Tone,
};

use crate::action::Action;
use crate::theme::Palette;

/// Default seconds between automation checks on the service side.
pub const DEFAULT_CHECK_INTERVAL: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Vpn,
    Proxy,
    Tor,
    Automation,
    CheckInterval,
}

impl Field {
    const ALL: [Field; 5] = [
        Self::Vpn,
        Self::Proxy,
        Self::Tor,
        Self::Automation,
        Self::CheckInterval,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Vpn => "VPN",
            Self::Proxy => "Proxy",
            Self::Tor => "Tor",
            Self::Automation => "Automation",
            Self::CheckInterval => "Check interval (s)",
        }
    }

    fn step(self, forward: bool) -> Self {
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        Self::ALL[next]
    }
}

#[derive(Debug)]
pub struct SettingsForm {
    field: Field,
    vpn: bool,
    proxy: bool,
    tor: bool,
    automation: bool,
    interval: Input,
    error: Option<String>,
}

impl SettingsForm {
    /// Pre-fill from the current view; every switch is off before the first
    /// refresh.
    pub fn new(status: Option<&StatusView>, check_interval: u64) -> Self {
        let enabled = |feature: PrivacyFeature| {
            status
                .and_then(|s| s.privacy_row(feature))
                .is_some_and(|row| row.enabled)
        };
        Self {
            field: Field::Vpn,
            vpn: enabled(PrivacyFeature::Vpn),
            proxy: enabled(PrivacyFeature::Proxy),
            tor: enabled(PrivacyFeature::Tor),
            automation: status.is_some_and(|s| s.automation.badge.tone == Tone::Good),
            interval: Input::new(check_interval.to_string()),
            error: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => return Some(Action::CloseSettings),
            KeyCode::Enter => {
                return self
                    .submit()
                    .map(|update| Action::Execute(Command::SaveConfig(update)));
            }
            KeyCode::Tab | KeyCode::Down => self.field = self.field.step(true),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.step(false),
            _ if self.field == Field::CheckInterval => self.edit_interval(key),
            KeyCode::Char(' ') => self.flip(),
            _ => {}
        }
        None
    }

    fn flip(&mut self) {
        match self.field {
            Field::Vpn => self.vpn = !self.vpn,
            Field::Proxy => self.proxy = !self.proxy,
            Field::Tor => self.tor = !self.tor,
            Field::Automation => self.automation = !self.automation,
            Field::CheckInterval => {}
        }
    }

    fn edit_interval(&mut self, key: KeyEvent) {
        let request = match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return,
        };
        self.interval.handle(request);
        self.error = None;
    }

    /// Build the write, or record why the form cannot be saved.
    fn submit(&mut self) -> Option<ConfigUpdate> {
        match self.interval.value().trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(ConfigUpdate {
                vpn: Some(self.vpn),
                proxy: Some(self.proxy),
                tor: Some(self.tor),
                automation: Some(AutomationUpdate {
                    enabled: self.automation,
                    check_interval: secs,
                }),
            }),
            _ => {
                self.error = Some("Check interval must be a positive number of seconds".into());
                self.field = Field::CheckInterval;
                None
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 12u16.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let modal = Rect::new(x, y, width, height);

        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(" Settings ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border(true))
            .style(Style::default().bg(palette.bg));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

        let switches: Vec<Line<'_>> = Field::ALL
            .iter()
            .map(|field| self.field_line(*field, palette))
            .collect();
        frame.render_widget(Paragraph::new(switches), rows[1]);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {error}"), palette.tone(Tone::Bad))),
                rows[3],
            );
        }

        let hints = Line::from(vec![
            Span::styled("  space ", palette.key_hint_key()),
            Span::styled("toggle  ", palette.key_hint()),
            Span::styled("enter ", palette.key_hint_key()),
            Span::styled("save  ", palette.key_hint()),
            Span::styled("esc ", palette.key_hint_key()),
            Span::styled("cancel", palette.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[4]);

        if self.field == Field::CheckInterval {
            let offset = u16::try_from(self.interval.visual_cursor()).unwrap_or(0);
            // "  > " + padded label
            frame.set_cursor_position((rows[1].x + 24 + offset, rows[1].y + 4));
        }
    }

    fn field_line(&self, field: Field, palette: &Palette) -> Line<'_> {
        let active = field == self.field;
        let marker = if active { "  > " } else { "    " };
        let label_style = if active {
            palette.selected()
        } else {
            palette.text()
        };
        let value = match field {
            Field::Vpn => checkbox(self.vpn),
            Field::Proxy => checkbox(self.proxy),
            Field::Tor => checkbox(self.tor),
            Field::Automation => checkbox(self.automation),
            Field::CheckInterval => self.interval.value().to_owned(),
        };
        Line::from(vec![
            Span::styled(marker, palette.key_hint_key()),
            Span::styled(format!("{:<20}", field.label()), label_style),
            Span::styled(value, palette.text()),
        ])
    }
}

fn checkbox(on: bool) -> String {
    if on { "[x]".into() } else { "[ ]".into() }
}
