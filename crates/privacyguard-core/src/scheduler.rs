// ── Refresh scheduling ──
//
// Cycles may overlap: a timer tick or manual trigger arriving mid-cycle
// starts another cycle right away. Each cycle is stamped with a
// generation at start, and publication is gated so that once a cycle has
// published, any older cycle finishing later is superseded instead of
// overwriting newer state.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::model::ViewSnapshot;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    /// At least one cycle is in flight.
    Refreshing,
}

/// The single outcome every refresh cycle reports.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Published {
        generation: u64,
        snapshot: Arc<ViewSnapshot>,
    },
    Failed {
        generation: u64,
        message: String,
    },
    /// The cycle succeeded but a newer cycle had already published.
    Superseded { generation: u64 },
}

impl RefreshOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Published { generation, .. }
            | Self::Failed { generation, .. }
            | Self::Superseded { generation } => *generation,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Publication gate: admits a generation only if it is newer than every
/// generation admitted before it.
#[derive(Debug, Default)]
pub struct GenerationGate {
    published: Mutex<u64>,
}

impl GenerationGate {
    /// Run `publish` if `generation` is the newest seen so far. The check
    /// and `publish` happen under one lock, so publications land in
    /// generation order.
    pub fn publish_if_newest(&self, generation: u64, publish: impl FnOnce()) -> bool {
        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= *published {
            return false;
        }
        *published = generation;
        publish();
        true
    }

    pub fn latest(&self) -> u64 {
        *self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Generation counter plus in-flight tracking for the `Idle`/`Refreshing`
/// state.
#[derive(Debug)]
pub struct RefreshScheduler {
    next_generation: AtomicU64,
    in_flight: AtomicUsize,
    state: watch::Sender<RefreshState>,
    snapshots: GenerationGate,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshScheduler {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);
        Self {
            next_generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state,
            snapshots: GenerationGate::default(),
        }
    }

    /// Start a cycle. The scheduler stays `Refreshing` until every
    /// outstanding ticket has been dropped.
    pub fn begin(&self) -> CycleTicket<'_> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            *state = RefreshState::Refreshing;
        });
        CycleTicket {
            scheduler: self,
            generation,
        }
    }

    fn end(&self) {
        self.state.send_if_modified(|state| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 {
                *state = RefreshState::Idle;
                true
            } else {
                false
            }
        });
    }

    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    pub fn snapshots(&self) -> &GenerationGate {
        &self.snapshots
    }
}

/// Handle for one in-flight cycle. Dropping it marks the cycle finished,
/// whether it completed or its future was dropped.
#[derive(Debug)]
pub struct CycleTicket<'a> {
    scheduler: &'a RefreshScheduler,
    generation: u64,
}

impl CycleTicket<'_> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CycleTicket<'_> {
    fn drop(&mut self) {
        self.scheduler.end();
    }
}
