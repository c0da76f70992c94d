//! Toast stack in the bottom-right corner, newest at the bottom.
//!
//! A fading toast has its colours blended towards the background by fade
//! progress; an expired toast is not drawn even if the next tick has not
//! removed it yet.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use privacyguard_core::{FeedbackChannel, ToastPhase};

use crate::theme::{self, Palette};

const TOAST_HEIGHT: u16 = 3;
const MAX_VISIBLE: usize = 4;

/// How opaque a toast is in `phase`: `None` when it should not be drawn.
pub fn fade_progress(phase: ToastPhase) -> Option<f32> {
    match phase {
        ToastPhase::Visible => Some(0.0),
        ToastPhase::Fading(progress) => Some(progress),
        ToastPhase::Expired => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn render_toasts(
    frame: &mut Frame,
    area: Rect,
    feedback: &FeedbackChannel,
    palette: &Palette,
    now: Instant,
) {
    let toasts: Vec<_> = feedback
        .toasts(now)
        .filter_map(|(toast, phase)| fade_progress(phase).map(|p| (toast, p)))
        .collect();
    let skip = toasts.len().saturating_sub(MAX_VISIBLE);

    // Above the status bar
    let mut bottom = area.y + area.height.saturating_sub(1);

    for (toast, progress) in toasts.iter().skip(skip).rev() {
        let msg_len = toast.message.chars().count().min(usize::from(u16::MAX)) as u16;
        let width = (msg_len + 6).clamp(20, 60).min(area.width);
        if bottom < area.y + TOAST_HEIGHT {
            break;
        }
        let y = bottom - TOAST_HEIGHT;
        let x = area.x + area.width.saturating_sub(width + 1);
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
        bottom = y;

        let accent = theme::fade(palette.severity_color(toast.severity), palette.bg, *progress);
        let text = theme::fade(palette.text, palette.bg, *progress);

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(palette.bg));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", theme::severity_icon(toast.severity)),
                Style::default().fg(accent),
            ),
            Span::styled(toast.message.as_str(), Style::default().fg(text)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn expired_toasts_are_hidden() {
        assert_eq!(fade_progress(ToastPhase::Visible), Some(0.0));
        assert_eq!(fade_progress(ToastPhase::Fading(0.25)), Some(0.25));
        assert_eq!(fade_progress(ToastPhase::Expired), None);
    }
}
