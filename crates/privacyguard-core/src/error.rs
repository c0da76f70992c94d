// ── Core error types ──
//
// User-facing errors from privacyguard-core. The `Display` output of every
// variant is the exact text written to the feedback channel, so callers can
// format `"{err}"` straight into a log entry.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// Any failure from the remote client, flattened to its message.
    #[error("{message}")]
    Transport { message: String },

    // ── Refresh ──────────────────────────────────────────────────────
    /// One of the fanned-out reads failed; the whole cycle is discarded.
    #[error("{endpoint}: {message}")]
    Aggregation {
        endpoint: &'static str,
        message: String,
    },

    // ── Commands ─────────────────────────────────────────────────────
    /// A write did not succeed. `action` reads as a verb phrase, e.g.
    /// `"enable eth0"` or `"save settings"`.
    #[error("Failed to {action}: {message}")]
    Command { action: String, message: String },

    // ── Reports ──────────────────────────────────────────────────────
    #[error("Invalid report: {reason}")]
    InvalidReport { reason: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Dashboard engine is not running")]
    Disconnected,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<privacyguard_api::Error> for CoreError {
    fn from(err: privacyguard_api::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

impl CoreError {
    /// Tag a transport failure with the endpoint it came from.
    pub(crate) fn aggregation(endpoint: &'static str) -> impl FnOnce(privacyguard_api::Error) -> Self {
        move |err| Self::Aggregation {
            endpoint,
            message: err.to_string(),
        }
    }
}
