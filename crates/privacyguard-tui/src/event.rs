//! Terminal input merged with the loop's two clocks.
//!
//! `Tick` expires toasts and spins the refresh throbber. `Render` paces
//! redraws; it has to be fast enough that a toast fade shows as a gradient
//! rather than a single jump.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::warn;

/// Colour steps a toast fade should get on screen.
const FADE_FRAMES: u32 = 12;
const TICK_RATE: Duration = Duration::from_millis(250);
const MIN_FRAME: Duration = Duration::from_millis(16);
const MAX_FRAME: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    Tick,
    Render,
}

/// Tick and render periods for the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub tick: Duration,
    pub render: Duration,
}

impl Clock {
    /// Render often enough to draw `FADE_FRAMES` steps of a fade lasting
    /// `fade`, within 20 to 60 frames per second.
    pub fn for_fade(fade: Duration) -> Self {
        Self {
            tick: TICK_RATE,
            render: (fade / FADE_FRAMES).clamp(MIN_FRAME, MAX_FRAME),
        }
    }
}

pub struct EventReader {
    input: EventStream,
    tick: Interval,
    render: Interval,
}

impl EventReader {
    pub fn new(clock: Clock) -> Self {
        let mut tick = tokio::time::interval(clock.tick);
        let mut render = tokio::time::interval(clock.render);
        // A slow frame should not be followed by a burst of catch-up frames
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        render.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            input: EventStream::new(),
            tick,
            render,
        }
    }

    /// Wait for the next event. `None` once terminal input has ended.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Some(Event::Tick),
                _ = self.render.tick() => return Some(Event::Render),
                input = self.input.next() => match input? {
                    Ok(event) => {
                        if let Some(event) = translate(event) {
                            return Some(event);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "terminal input failed");
                        return None;
                    }
                },
            }
        }
    }
}

/// Keep presses, held-key repeats and resizes; drop everything else.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn render_rate_follows_fade() {
        let clock = Clock::for_fade(Duration::from_millis(400));
        assert_eq!(clock.tick, TICK_RATE);
        assert_eq!(clock.render.as_millis(), 33);

        assert_eq!(Clock::for_fade(Duration::ZERO).render, MIN_FRAME);
        assert_eq!(Clock::for_fade(Duration::from_secs(5)).render, MAX_FRAME);
    }

    #[test]
    fn key_releases_are_dropped() {
        let key = |kind| {
            CrosstermEvent::Key(KeyEvent {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::NONE,
                kind,
                state: KeyEventState::NONE,
            })
        };
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert!(matches!(translate(key(KeyEventKind::Repeat)), Some(Event::Key(_))));
        assert_eq!(translate(key(KeyEventKind::Release)), None);
        assert_eq!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Resize(80, 24)));
        assert_eq!(translate(CrosstermEvent::FocusLost), None);
    }
}
