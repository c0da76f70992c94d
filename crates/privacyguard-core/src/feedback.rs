// ── Feedback channel ──
//
// Two surfaces with identical content: a persistent activity log (newest
// first, unbounded, emptied only by `clear`) and transient toasts. A toast
// stays fully visible for the toast duration, then fades, and is removed
// only by the first `tick` after the fade has completed.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use strum::Display;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(400);

const LOGS_CLEARED: &str = "Logs cleared";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
}

/// Where a toast is in its life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastPhase {
    Visible,
    /// Fade progress from 0.0 (opaque) to 1.0 (gone).
    Fading(f32),
    /// Fade complete; removed on the next tick.
    Expired,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    raised_at: Instant,
}

#[derive(Debug)]
pub struct FeedbackChannel {
    log: VecDeque<LogEntry>,
    toasts: Vec<Toast>,
    next_id: u64,
    toast_duration: Duration,
    fade_duration: Duration,
}

impl Default for FeedbackChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION, DEFAULT_FADE_DURATION)
    }
}

impl FeedbackChannel {
    pub fn new(toast_duration: Duration, fade_duration: Duration) -> Self {
        Self {
            log: VecDeque::new(),
            toasts: Vec::new(),
            next_id: 0,
            toast_duration,
            fade_duration,
        }
    }

    /// Record `message` on both surfaces.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        self.log.push_front(LogEntry {
            timestamp: Local::now(),
            message: message.clone(),
            severity,
        });
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            message,
            severity,
            raised_at: now,
        });
    }

    /// Log entries, newest first.
    pub fn log(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Empty the log, then record that it was cleared.
    pub fn clear(&mut self, now: Instant) {
        self.log.clear();
        self.notify(LOGS_CLEARED, Severity::Info, now);
    }

    pub fn phase(&self, toast: &Toast, now: Instant) -> ToastPhase {
        let age = now.saturating_duration_since(toast.raised_at);
        if age < self.toast_duration {
            return ToastPhase::Visible;
        }
        let fading = age - self.toast_duration;
        if fading < self.fade_duration {
            ToastPhase::Fading(fading.as_secs_f32() / self.fade_duration.as_secs_f32())
        } else {
            ToastPhase::Expired
        }
    }

    /// Toasts still on screen with their phase, oldest first.
    pub fn toasts(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.toasts.iter().map(move |t| (t, self.phase(t, now)))
    }

    /// Drop toasts whose fade has completed. Returns how many were removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let toast_duration = self.toast_duration;
        let fade_duration = self.fade_duration;
        self.toasts.retain(|t| {
            now.saturating_duration_since(t.raised_at) < toast_duration + fade_duration
        });
        before - self.toasts.len()
    }
}
