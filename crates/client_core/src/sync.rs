use std::{sync::Arc, time::Duration};

use shared::domain::{Cell, Scoreboard};
use tokio::{
    sync::{broadcast, mpsc},
    task::{JoinHandle, JoinSet},
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

use crate::backend::PixelBackend;

pub const SYNC_PERIOD: Duration = Duration::from_secs(5);
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFamily {
    Grid,
    Scoreboard,
}

/// Result of one half of a sync cycle. `seq` grows by one per cycle, so a
/// consumer can tell a late response from an earlier cycle apart from a
/// fresh one.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    GridFetched {
        seq: u64,
        cells: Vec<Cell>,
    },
    ScoreboardFetched {
        seq: u64,
        scoreboard: Scoreboard,
    },
    FetchFailed {
        seq: u64,
        family: FetchFamily,
        error: String,
    },
}

impl SyncEvent {
    pub fn seq(&self) -> u64 {
        match self {
            Self::GridFetched { seq, .. }
            | Self::ScoreboardFetched { seq, .. }
            | Self::FetchFailed { seq, .. } => *seq,
        }
    }
}

/// Something that can force an immediate sync cycle.
pub trait RefreshTrigger: Send + Sync {
    fn trigger_now(&self);
}

#[derive(Clone)]
pub struct SyncHandle {
    trigger_tx: mpsc::UnboundedSender<()>,
}

impl RefreshTrigger for SyncHandle {
    fn trigger_now(&self) {
        if self.trigger_tx.send(()).is_err() {
            debug!("sync scheduler stopped; dropping refresh request");
        }
    }
}

/// Polls the backend for the grid and scoreboard on a fixed period.
///
/// Cycles are not serialized: a slow response does not hold back the next
/// tick, and both fetches of a cycle run as separate tasks.
pub struct SyncScheduler {
    handle: SyncHandle,
    events: broadcast::Sender<SyncEvent>,
    task: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Starts polling immediately. Must be called inside a tokio runtime.
    pub fn start(backend: Arc<dyn PixelBackend>) -> (Self, broadcast::Receiver<SyncEvent>) {
        Self::start_with_period(backend, SYNC_PERIOD)
    }

    pub fn start_with_period(
        backend: Arc<dyn PixelBackend>,
        period: Duration,
    ) -> (Self, broadcast::Receiver<SyncEvent>) {
        let (events, events_rx) = broadcast::channel(EVENT_CAPACITY);
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_timer(backend, events.clone(), trigger_rx, period));
        info!(period_ms = period.as_millis() as u64, "sync scheduler started");
        let scheduler = Self {
            handle: SyncHandle { trigger_tx },
            events,
            task: Some(task),
        };
        (scheduler, events_rx)
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn trigger_now(&self) {
        self.handle.trigger_now();
    }

    /// Cancels the timer together with every fetch it still has in flight.
    /// No request is issued once this returns.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        info!("sync scheduler stopped");
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_timer(
    backend: Arc<dyn PixelBackend>,
    events: broadcast::Sender<SyncEvent>,
    mut trigger_rx: mpsc::UnboundedReceiver<()>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // owned here so aborting the timer also aborts outstanding fetches
    let mut inflight = JoinSet::new();
    let mut seq = 0_u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Some(()) = trigger_rx.recv() => {
                debug!("out-of-band sync requested");
            }
            Some(_) = inflight.join_next(), if !inflight.is_empty() => continue,
        }
        seq += 1;
        spawn_cycle(&mut inflight, &backend, &events, seq);
    }
}

fn spawn_cycle(
    inflight: &mut JoinSet<()>,
    backend: &Arc<dyn PixelBackend>,
    events: &broadcast::Sender<SyncEvent>,
    seq: u64,
) {
    let grid_backend = Arc::clone(backend);
    let grid_events = events.clone();
    inflight.spawn(async move {
        let event = match grid_backend.fetch_pixels().await {
            Ok(cells) => {
                debug!(seq, cells = cells.len(), "grid fetched");
                SyncEvent::GridFetched { seq, cells }
            }
            Err(err) => {
                warn!(seq, %err, "grid fetch failed; keeping cached grid");
                SyncEvent::FetchFailed {
                    seq,
                    family: FetchFamily::Grid,
                    error: err.to_string(),
                }
            }
        };
        let _ = grid_events.send(event);
    });

    let score_backend = Arc::clone(backend);
    let score_events = events.clone();
    inflight.spawn(async move {
        let event = match score_backend.fetch_scoreboard().await {
            Ok(scoreboard) => {
                debug!(seq, users = scoreboard.entries().len(), "scoreboard fetched");
                SyncEvent::ScoreboardFetched { seq, scoreboard }
            }
            Err(err) => {
                warn!(seq, %err, "scoreboard fetch failed; keeping cached scoreboard");
                SyncEvent::FetchFailed {
                    seq,
                    family: FetchFamily::Scoreboard,
                    error: err.to_string(),
                }
            }
        };
        let _ = score_events.send(event);
    });
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
