//! Data bridge: connects the [`Dashboard`] engine to TUI actions.
//!
//! Runs as a background task: starts the engine, then forwards every
//! [`SyncEvent`] and refresh-state transition as an [`Action`] through the
//! TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use privacyguard_core::{Dashboard, Severity, SyncEvent};

use crate::action::Action;

/// Start the engine and forward its events until cancelled, then shut the
/// engine down.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    mut events: mpsc::UnboundedReceiver<SyncEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    if let Err(e) = dashboard.start().await {
        warn!(error = %e, "failed to start dashboard engine");
        let _ = action_tx.send(Action::Notify(
            format!("Failed to start dashboard: {e}"),
            Severity::Error,
        ));
        return;
    }

    let mut state = dashboard.subscribe_refresh_state();
    let _ = action_tx.send(Action::RefreshStateChanged(*state.borrow_and_update()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(event) = events.recv() => {
                let _ = action_tx.send(Action::Sync(event));
            }
            Ok(()) = state.changed() => {
                let current = *state.borrow_and_update();
                let _ = action_tx.send(Action::RefreshStateChanged(current));
            }
            else => break,
        }
    }

    dashboard.shutdown().await;
    debug!("data bridge shut down");
}
