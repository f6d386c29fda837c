//! # Tick Runtime
//!
//! Runs a [`DashboardSession`] on a tokio task that owns it exclusively.
//! Timer ticks and view events are serialized through one `select!` loop,
//! and every change is published as an immutable [`FleetSnapshot`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::{SimulatorError, SimulatorResult};
use crate::motion::MotionSimulator;
use crate::session::{DashboardSession, FleetSnapshot, ViewEvent};

const EVENT_BUFFER: usize = 64;

/// Loop options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub tick_interval: Duration,
    /// End the loop once no drone is in transit.
    pub stop_when_delivered: bool,
    /// End the loop after this many ticks. `Some(0)` never ticks.
    pub max_ticks: Option<u64>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(crate::config::DEFAULT_TICK_MS),
            stop_when_delivered: false,
            max_ticks: None,
        }
    }
}

/// Handle to a running simulation.
///
/// Dropping the handle aborts the loop and its timer.
#[derive(Debug)]
pub struct SimulationHandle {
    events: mpsc::Sender<ViewEvent>,
    snapshots: watch::Receiver<FleetSnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<DashboardSession>>,
}

/// Start the loop on the current tokio runtime.
pub fn spawn(
    session: DashboardSession,
    motion: MotionSimulator,
    options: RuntimeOptions,
) -> SimulationHandle {
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run_loop(
        session,
        motion,
        options,
        event_rx,
        shutdown_rx,
        snapshot_tx,
    ));

    SimulationHandle {
        events: event_tx,
        snapshots: snapshot_rx,
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

impl SimulationHandle {
    /// Forward a user interaction to the loop.
    pub async fn send(&self, event: ViewEvent) -> SimulatorResult<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| SimulatorError::Stopped)
    }

    /// New receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FleetSnapshot> {
        self.snapshots.clone()
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> FleetSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop the timer and hand back the final session.
    pub async fn shutdown(mut self) -> SimulatorResult<DashboardSession> {
        if let Some(tx) = self.shutdown.take() {
            // The loop may already have ended on its own.
            let _ = tx.send(());
        }
        self.join_task().await
    }

    /// Feed every published snapshot to `on_snapshot` until the loop ends
    /// or `signal` resolves, then shut down.
    ///
    /// `signal` is polled as one pinned future for the whole run.
    pub async fn run_until<F, S>(
        self,
        signal: F,
        mut on_snapshot: S,
    ) -> SimulatorResult<DashboardSession>
    where
        F: Future,
        S: FnMut(&FleetSnapshot),
    {
        let mut snapshots = self.subscribe();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                _ = &mut signal => {
                    info!("Stop signal received, shutting down");
                    break;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        // Loop ended on its own.
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    on_snapshot(&snapshot);
                }
            }
        }

        self.shutdown().await
    }

    /// Wait for the loop to end on its own.
    pub async fn join(mut self) -> SimulatorResult<DashboardSession> {
        self.join_task().await
    }

    async fn join_task(&mut self) -> SimulatorResult<DashboardSession> {
        let task = self.task.take().ok_or(SimulatorError::Stopped)?;
        Ok(task.await?)
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_loop(
    mut session: DashboardSession,
    motion: MotionSimulator,
    options: RuntimeOptions,
    mut events: mpsc::Receiver<ViewEvent>,
    mut shutdown: oneshot::Receiver<()>,
    snapshots: watch::Sender<FleetSnapshot>,
) -> DashboardSession {
    let mut interval = time::interval(options.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; motion starts one period in.
    interval.tick().await;

    info!(
        session_id = %session.session_id,
        tick_ms = u64::try_from(options.tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Simulation loop started"
    );

    let limit_reached = |ticks: u64| options.max_ticks.is_some_and(|max| ticks >= max);

    while !limit_reached(session.tick_count()) {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Shutdown requested");
                break;
            }
            _ = interval.tick() => {
                let report = session.tick(&motion);
                snapshots.send_replace(session.snapshot());
                if options.stop_when_delivered && report.all_delivered() {
                    info!(tick = session.tick_count(), "All orders delivered");
                    break;
                }
                if limit_reached(session.tick_count()) {
                    info!(tick = session.tick_count(), "Tick limit reached");
                }
            }
            Some(event) = events.recv() => {
                session.handle(event);
                snapshots.send_replace(session.snapshot());
            }
        }
    }

    info!(
        session_id = %session.session_id,
        ticks = session.tick_count(),
        "Simulation loop stopped"
    );
    session
}
