//! Dashboard Controller
//!
//! Owns the [`DashboardState`], runs the poll loop and applies fetch
//! results.
//!
//! Every fetch is issued against a ticket recording its sequence number and
//! the range epoch at dispatch. A completed fetch is applied only if the
//! controller is still active, the range has not changed since dispatch and
//! no newer fetch has been applied already. Failures go through the same
//! check, so a late error never shadows fresher data.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{oneshot, watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::model::{DashboardState, Sample, TimeRange};
use crate::source::{FetchResult, SampleSource};

/// Default time between poll ticks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// What happened to a fetch once it completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Samples replaced, error cleared
    Updated { points: usize },
    /// Error set, samples untouched
    Failed,
    /// Result dropped: stale, or the controller was torn down
    Discarded,
}

#[derive(Debug, Clone, Copy)]
struct FetchTicket {
    seq: u64,
    epoch: u64,
    range: TimeRange,
}

#[derive(Debug)]
struct Dispatch {
    range: TimeRange,
    range_epoch: u64,
    next_seq: u64,
    applied_seq: u64,
    active: bool,
}

/// Polls a [`SampleSource`] and publishes [`DashboardState`]
pub struct DashboardController {
    source: Arc<dyn SampleSource>,
    state_tx: watch::Sender<DashboardState>,
    dispatch: Mutex<Dispatch>,
    range_changed: Notify,
    started: AtomicBool,
    interval: Duration,
}

impl DashboardController {
    /// Create a controller polling `initial_range` every `interval`
    pub fn new(
        source: Arc<dyn SampleSource>,
        interval: Duration,
        initial_range: TimeRange,
    ) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::new(initial_range));

        Self {
            source,
            state_tx,
            dispatch: Mutex::new(Dispatch {
                range: initial_range,
                range_epoch: 0,
                next_seq: 0,
                applied_seq: 0,
                active: true,
            }),
            range_changed: Notify::new(),
            started: AtomicBool::new(false),
            interval,
        }
    }

    fn lock_dispatch(&self) -> MutexGuard<'_, Dispatch> {
        self.dispatch.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Interval between poll ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    pub fn active_range(&self) -> TimeRange {
        self.lock_dispatch().range
    }

    /// Whether the controller has not been torn down
    pub fn is_active(&self) -> bool {
        self.lock_dispatch().active
    }

    pub fn point_count(&self) -> usize {
        self.state_tx.borrow().point_count()
    }

    pub fn latest_temperature(&self) -> Option<f64> {
        self.state_tx.borrow().latest_temperature()
    }

    pub fn average_temperature(&self) -> Option<f64> {
        self.state_tx.borrow().average_temperature()
    }

    /// Switch the polled range
    ///
    /// Results of fetches issued under the previous range are discarded.
    /// When the poll loop is running it fetches immediately and restarts
    /// its timer, so the next tick is one full interval away. Returns
    /// `false` if `range` was already active or the controller is torn down.
    pub fn set_active_range(&self, range: TimeRange) -> bool {
        {
            let mut dispatch = self.lock_dispatch();
            if !dispatch.active || dispatch.range == range {
                return false;
            }

            dispatch.range = range;
            dispatch.range_epoch += 1;
            self.state_tx.send_modify(|state| state.active_range = range);
        }

        tracing::info!(range = %range, "Active range changed");

        if self.started.load(Ordering::SeqCst) {
            self.range_changed.notify_one();
        }
        true
    }

    /// Fetch the active range once and apply the result
    pub async fn fetch_once(&self) -> FetchOutcome {
        let Some(ticket) = self.issue_ticket() else {
            return FetchOutcome::Discarded;
        };

        let result = self.source.fetch(ticket.range).await;
        self.apply(ticket, result)
    }

    fn issue_ticket(&self) -> Option<FetchTicket> {
        let mut dispatch = self.lock_dispatch();
        if !dispatch.active {
            return None;
        }

        dispatch.next_seq += 1;
        Some(FetchTicket {
            seq: dispatch.next_seq,
            epoch: dispatch.range_epoch,
            range: dispatch.range,
        })
    }

    fn apply(&self, ticket: FetchTicket, result: FetchResult<Vec<Sample>>) -> FetchOutcome {
        let mut dispatch = self.lock_dispatch();

        if !dispatch.active {
            return FetchOutcome::Discarded;
        }
        if ticket.epoch != dispatch.range_epoch || ticket.seq <= dispatch.applied_seq {
            tracing::debug!(
                seq = ticket.seq,
                range = %ticket.range,
                applied_seq = dispatch.applied_seq,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Discarded;
        }
        dispatch.applied_seq = ticket.seq;

        match result {
            Ok(samples) => {
                let points = samples.len();
                self.state_tx.send_modify(|state| {
                    state.samples = samples;
                    state.last_updated = Some(Utc::now());
                    state.error = None;
                });
                tracing::debug!(range = %ticket.range, points, "Dashboard updated");
                FetchOutcome::Updated { points }
            }
            Err(e) => {
                tracing::warn!(
                    range = %ticket.range,
                    source = %self.source.describe(),
                    error = %e,
                    "Failed to fetch samples"
                );
                let message = e.user_message();
                self.state_tx.send_modify(|state| {
                    state.error = Some(message.to_string());
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Mark the controller torn down. Pending and future fetches become no-ops.
    fn deactivate(&self) {
        let mut dispatch = self.lock_dispatch();
        if dispatch.active {
            dispatch.active = false;
            tracing::debug!("Dashboard controller torn down");
        }
    }

    /// Start the poll loop
    ///
    /// Fetches immediately, then once per interval until the returned
    /// handle is shut down or dropped. A torn-down controller stays inactive.
    pub fn start(self: &Arc<Self>) -> PollHandle {
        self.started.store(true, Ordering::SeqCst);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move { controller.poll_loop(shutdown_rx).await });

        tracing::info!(
            source = %self.source.describe(),
            interval_ms = self.interval.as_millis() as u64,
            range = %self.active_range(),
            "Polling started"
        );

        PollHandle {
            controller: Arc::clone(self),
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn poll_loop(self: Arc<Self>, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                _ = self.range_changed.notified() => {
                    ticker.reset();
                    self.spawn_fetch(&mut in_flight);
                }

                _ = ticker.tick() => self.spawn_fetch(&mut in_flight),

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Fetch task panicked");
                        }
                    }
                }
            }
        }

        in_flight.shutdown().await;
        tracing::info!("Polling stopped");
    }

    fn spawn_fetch(self: &Arc<Self>, in_flight: &mut JoinSet<()>) {
        if !self.is_active() {
            return;
        }

        let controller = Arc::clone(self);
        in_flight.spawn(async move {
            controller.fetch_once().await;
        });
    }
}

/// Guard for a running poll loop
///
/// Dropping the handle tears the controller down and aborts the loop along
/// with any fetch still in flight.
pub struct PollHandle {
    controller: Arc<DashboardController>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// The controller driven by this loop
    pub fn controller(&self) -> &Arc<DashboardController> {
        &self.controller
    }

    /// Stop polling and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.controller.deactivate();

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "Poll loop panicked");
                }
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.controller.deactivate();

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
