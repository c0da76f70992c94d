//! Dark and light palettes and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use privacyguard_core::{Severity, ThemePreference, Tone};

/// One complete colour set. Everything drawn goes through a palette so a
/// theme switch repaints the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub good: Color,
    pub bad: Color,
    pub warning: Color,
    pub info: Color,
    /// Series colours for the three charts.
    pub series: [Color; 3],
}

// ── Palettes ──────────────────────────────────────────────────────────

pub const DARK: Palette = Palette {
    bg: Color::Rgb(30, 31, 41),         // #1e1f29
    surface: Color::Rgb(40, 42, 54),    // #282a36
    text: Color::Rgb(189, 193, 207),    // #bdc1cf
    muted: Color::Rgb(98, 114, 164),    // #6272a4
    accent: Color::Rgb(128, 255, 234),  // #80ffea
    highlight: Color::Rgb(225, 53, 255), // #e135ff
    good: Color::Rgb(80, 250, 123),     // #50fa7b
    bad: Color::Rgb(255, 99, 99),       // #ff6363
    warning: Color::Rgb(241, 250, 140), // #f1fa8c
    info: Color::Rgb(139, 233, 253),    // #8be9fd
    series: [
        Color::Rgb(128, 255, 234),
        Color::Rgb(255, 106, 193),
        Color::Rgb(225, 53, 255),
    ],
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(250, 250, 252),      // #fafafc
    surface: Color::Rgb(234, 236, 242), // #eaecf2
    text: Color::Rgb(44, 46, 58),       // #2c2e3a
    muted: Color::Rgb(120, 126, 148),   // #787e94
    accent: Color::Rgb(0, 122, 138),    // #007a8a
    highlight: Color::Rgb(140, 30, 170), // #8c1eaa
    good: Color::Rgb(30, 140, 60),      // #1e8c3c
    bad: Color::Rgb(200, 40, 40),       // #c82828
    warning: Color::Rgb(170, 120, 0),   // #aa7800
    info: Color::Rgb(30, 100, 190),     // #1e64be
    series: [
        Color::Rgb(0, 122, 138),
        Color::Rgb(200, 60, 130),
        Color::Rgb(140, 30, 170),
    ],
};

impl Palette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => DARK,
            ThemePreference::Light => LIGHT,
        }
    }

    // ── Semantic styles ───────────────────────────────────────────────

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .bg(self.surface)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::Good => Style::default().fg(self.good),
            Tone::Bad => Style::default().fg(self.bad),
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.good,
            Severity::Error => self.bad,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }
}

pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Error => "✗",
        Severity::Warning => "!",
        Severity::Info => "·",
    }
}

// ── Fade ──────────────────────────────────────────────────────────────

/// Blend `from` towards `to`; `progress` 0.0 is `from`, 1.0 is `to`.
/// Non-RGB colours snap at the halfway point.
pub fn fade(from: Color, to: Color, progress: f32) -> Color {
    let t = progress.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            Color::Rgb(lerp(r1, r2, t), lerp(g1, g2, t), lerp(b1, b2, t))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let (a, b) = (f32::from(a), f32::from(b));
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fade_endpoints_and_midpoint() {
        let from = Color::Rgb(0, 100, 200);
        let to = Color::Rgb(100, 100, 0);
        assert_eq!(fade(from, to, 0.0), from);
        assert_eq!(fade(from, to, 1.0), to);
        assert_eq!(fade(from, to, 0.5), Color::Rgb(50, 100, 100));
        assert_eq!(fade(from, to, 7.0), to);
    }

    #[test]
    fn named_colours_snap() {
        assert_eq!(fade(Color::Red, Color::Black, 0.2), Color::Red);
        assert_eq!(fade(Color::Red, Color::Black, 0.8), Color::Black);
    }

    #[test]
    fn palettes_follow_preference() {
        assert_eq!(Palette::for_theme(ThemePreference::Dark), DARK);
        assert_eq!(Palette::for_theme(ThemePreference::Light), LIGHT);
        assert_eq!(LIGHT.severity_color(Severity::Error), LIGHT.bad);
    }
}
