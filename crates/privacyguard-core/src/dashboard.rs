// ── Dashboard engine ──
//
// Owns all network-facing work: periodic and manual refresh cycles, the
// command processor, report loading and on-demand reads. View state lives
// elsewhere (`ViewContext`); the engine only reports to it through
// `SyncEvent`s.

use std::sync::Arc;
use std::time::Duration;

use privacyguard_api::{ApiClient, TransportConfig};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::charts::parse_report;
use crate::command::{Command, CommandEnvelope, CommandResult, ConfigUpdate};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::event::{CommandOutcome, SyncEvent};
use crate::model::{InterfaceStatus, Report, ViewSnapshot};
use crate::scheduler::{GenerationGate, RefreshOutcome, RefreshScheduler, RefreshState};
use crate::snapshot::build_snapshot;

const COMMAND_CHANNEL_SIZE: usize = 64;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Create it, hand the event
/// receiver to the view, then [`start()`](Self::start) the background
/// tasks.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: ApiClient,
    scheduler: RefreshScheduler,
    reports: GenerationGate,
    snapshot: watch::Sender<Option<Arc<ViewSnapshot>>>,
    report: watch::Sender<Option<Arc<Report>>>,
    events: mpsc::UnboundedSender<SyncEvent>,
    /// Present while the engine is running.
    command_tx: Mutex<Option<mpsc::Sender<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build the engine and its HTTP client from configuration.
    pub fn new(
        config: DashboardConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SyncEvent>), CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
            ..TransportConfig::default()
        };
        let client = ApiClient::new(config.api_url.clone(), &transport).map_err(|e| {
            CoreError::Config {
                message: e.to_string(),
            }
        })?;
        Ok(Self::with_client(client, config))
    }

    /// Build the engine around an existing client.
    pub fn with_client(
        client: ApiClient,
        config: DashboardConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (snapshot, _) = watch::channel(None);
        let (report, _) = watch::channel(None);

        let dashboard = Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                scheduler: RefreshScheduler::new(),
                reports: GenerationGate::default(),
                snapshot,
                report,
                events,
                command_tx: Mutex::new(None),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        };
        (dashboard, events_rx)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the command processor and the periodic refresh task. The
    /// first refresh runs immediately. Calling `start` on a running engine
    /// does nothing; calling it after [`shutdown()`](Self::shutdown) fails.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::Disconnected);
        }

        let mut command_tx = self.inner.command_tx.lock().await;
        if command_tx.is_some() {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        *command_tx = Some(tx);
        drop(command_tx);

        let mut handles = self.inner.task_handles.lock().await;
        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(command_processor_task(
            self.clone(),
            rx,
            cancel.clone(),
        )));
        handles.push(tokio::spawn(refresh_task(
            self.clone(),
            self.inner.config.refresh_interval,
            cancel,
        )));

        info!(
            url = %self.inner.client.base_url(),
            interval_secs = self.inner.config.refresh_interval.as_secs(),
            "dashboard engine started"
        );
        Ok(())
    }

    /// Stop the background tasks. In-flight refresh cycles run to
    /// completion; their results are still reported.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        *self.inner.command_tx.lock().await = None;

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard engine stopped");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Run one refresh cycle: the snapshot reads and the report read, all
    /// concurrently. Emits exactly one `SyncEvent::Refresh`.
    pub async fn refresh(&self) -> RefreshOutcome {
        let inner = &self.inner;
        let ticket = inner.scheduler.begin();
        let generation = ticket.generation();
        debug!(generation, "refresh cycle started");

        let (snapshot, report) =
            tokio::join!(build_snapshot(&inner.client), inner.client.get_reports());

        self.apply_report(generation, report.map_err(CoreError::from));

        let outcome = match snapshot {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let published = inner.scheduler.snapshots().publish_if_newest(generation, || {
                    inner.snapshot.send_replace(Some(Arc::clone(&snapshot)));
                    self.emit(SyncEvent::Refresh(RefreshOutcome::Published {
                        generation,
                        snapshot: Arc::clone(&snapshot),
                    }));
                });
                if published {
                    debug!(generation, "snapshot published");
                    RefreshOutcome::Published {
                        generation,
                        snapshot,
                    }
                } else {
                    debug!(generation, "snapshot superseded by a newer cycle");
                    let outcome = RefreshOutcome::Superseded { generation };
                    self.emit(SyncEvent::Refresh(outcome.clone()));
                    outcome
                }
            }
            Err(e) => {
                warn!(generation, error = %e, "refresh failed");
                let outcome = RefreshOutcome::Failed {
                    generation,
                    message: e.to_string(),
                };
                self.emit(SyncEvent::Refresh(outcome.clone()));
                outcome
            }
        };

        drop(ticket);
        outcome
    }

    /// Start a refresh cycle without waiting for it.
    pub fn trigger_refresh(&self) -> JoinHandle<RefreshOutcome> {
        let dashboard = self.clone();
        tokio::spawn(async move { dashboard.refresh().await })
    }

    /// Report sub-update. Failures only reach the diagnostic log and never
    /// affect the snapshot.
    fn apply_report(&self, generation: u64, raw: Result<serde_json::Value, CoreError>) {
        let report = match raw.and_then(parse_report) {
            Ok(report) => Arc::new(report),
            Err(e) => {
                warn!(generation, error = %e, "report not updated");
                return;
            }
        };
        let published = self.inner.reports.publish_if_newest(generation, || {
            self.inner.report.send_replace(Some(Arc::clone(&report)));
            self.emit(SyncEvent::Report(Arc::clone(&report)));
        });
        if !published {
            debug!(generation, "report superseded by a newer cycle");
        }
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.inner.scheduler.state()
    }

    pub fn subscribe_refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.scheduler.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Option<Arc<ViewSnapshot>> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<Option<Arc<ViewSnapshot>>> {
        self.inner.snapshot.subscribe()
    }

    /// The latest valid report.
    pub fn report(&self) -> Option<Arc<Report>> {
        self.inner.report.borrow().clone()
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result, which includes the outcome
    /// of the follow-up refresh.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let command_tx = self
            .inner
            .command_tx
            .lock()
            .await
            .clone()
            .ok_or(CoreError::Disconnected)?;

        let (tx, rx) = tokio::sync::oneshot::channel();
        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── On-demand reads ──────────────────────────────────────────

    /// Server-held log lines, newest first.
    pub async fn fetch_server_logs(&self) -> Result<Vec<String>, CoreError> {
        let mut logs = self.inner.client.get_logs().await?;
        logs.reverse();
        Ok(logs)
    }

    pub async fn interface_status(&self, name: &str) -> Result<InterfaceStatus, CoreError> {
        let entry = self.inner.client.get_interface_status(name).await?;
        Ok(entry.into())
    }

    fn emit(&self, event: SyncEvent) {
        if self.inner.events.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodic refresh. Each tick spawns its own cycle so a slow cycle never
/// delays the next tick.
async fn refresh_task(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                dashboard.trigger_refresh();
            }
        }
    }
}

/// Process commands one at a time from the mpsc channel.
async fn command_processor_task(
    dashboard: Dashboard,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&dashboard, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Perform the write for `cmd`. On success, report it and run one
/// follow-up refresh; on failure, report it and change nothing.
async fn route_command(dashboard: &Dashboard, cmd: Command) -> Result<CommandResult, CoreError> {
    let client = &dashboard.inner.client;

    let written = match &cmd {
        Command::ToggleInterface { name, enable } => {
            client.toggle_interface(name, *enable).await.map(|_| ())
        }
        Command::SaveConfig(update) => client.update_config(&update.to_patch()).await.map(|_| ()),
        Command::SetPrivacyFeature { feature, enabled } => {
            let patch = ConfigUpdate::feature(*feature, *enabled).to_patch();
            client.update_config(&patch).await.map(|_| ())
        }
        Command::SetPreferredInterface { name } => {
            client.set_preferred_interface(name).await.map(|_| ())
        }
    };

    if let Err(e) = written {
        let err = cmd.failed(&e);
        warn!(error = %err, "command failed");
        dashboard.emit(SyncEvent::Command(CommandOutcome::Failed {
            message: err.to_string(),
        }));
        return Err(err);
    }

    let message = cmd.success_message();
    info!(%message, "command applied");
    dashboard.emit(SyncEvent::Command(CommandOutcome::Succeeded {
        message: message.clone(),
    }));

    let refresh = dashboard.refresh().await;
    Ok(CommandResult { message, refresh })
}
