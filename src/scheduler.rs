// src/scheduler.rs
//! Run-state machine and the scheduled cycle loop.
//!
//! `start` spawns a cancellable tokio task: an interval drives the cycle
//! body, and a watch channel makes `stop` deterministic — the next tick
//! never fires after stop, though a cycle already in flight is allowed to
//! finish. A manual trigger runs the cycle body regardless of run state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant};
use tracing::info;

use crate::pipeline::{CycleReport, FilterPipeline};

pub const DEFAULT_START_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    Running,
    Stopped,
}

struct SchedulerInner {
    state: RunState,
    // Present only while Running; dropping it also cancels the loop.
    shutdown: Option<watch::Sender<bool>>,
}

pub struct SentinelScheduler {
    pipeline: Arc<FilterPipeline>,
    interval: Duration,
    start_delay: Duration,
    inner: Mutex<SchedulerInner>,
}

impl SentinelScheduler {
    pub fn new(pipeline: Arc<FilterPipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            start_delay: Duration::from_secs(DEFAULT_START_DELAY_SECS),
            inner: Mutex::new(SchedulerInner {
                state: RunState::Stopped,
                shutdown: None,
            }),
        }
    }

    /// Shorten the initial delay in tests.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn state(&self) -> RunState {
        self.inner.lock().expect("scheduler lock poisoned").state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Transition to Running and spawn the cycle loop. Returns `false` if
    /// already running.
    pub fn start(&self) -> bool {
        let mut g = self.inner.lock().expect("scheduler lock poisoned");
        if g.state == RunState::Running {
            return false;
        }

        let (tx, mut rx) = watch::channel(false);
        let pipeline = self.pipeline.clone();
        let interval = self.interval;
        let start_delay = self.start_delay;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + start_delay, interval);
            loop {
                tokio::select! {
                    biased;
                    _ = rx.changed() => {
                        info!(target: "scheduler", "cycle loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let report = pipeline.run_cycle().await;
                        info!(target: "scheduler", summary = %report.summary(), "scheduled cycle");
                    }
                }
            }
        });

        g.shutdown = Some(tx);
        g.state = RunState::Running;
        info!(target: "scheduler", interval_secs = interval.as_secs(), "started");
        true
    }

    /// Transition to Stopped; the next scheduled cycle will not fire.
    /// Returns `false` if already stopped.
    pub fn stop(&self) -> bool {
        let mut g = self.inner.lock().expect("scheduler lock poisoned");
        if g.state == RunState::Stopped {
            return false;
        }
        if let Some(tx) = g.shutdown.take() {
            let _ = tx.send(true);
        }
        g.state = RunState::Stopped;
        info!(target: "scheduler", "stopped");
        true
    }

    /// Manual trigger: run the cycle body now, synchronously for the caller,
    /// regardless of run state. May interleave with a scheduled cycle; the
    /// seen-store keeps dedup atomic per id.
    pub async fn run_now(&self) -> CycleReport {
        self.pipeline.run_cycle().await
    }
}
