//! Async race driver
//!
//! Drives a `RaceSimulation` one tick at a time on the tokio runtime. Between
//! ticks control goes back to the executor, so renderers can pick up the
//! latest `RaceFrame` while the race runs. Nothing here blocks a thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;

use crate::core::config::RaceConfig;
use crate::core::error::Result;
use crate::core::rng::RandomSource;
use crate::core::types::Race;
use crate::race::result::RaceResult;
use crate::race::simulation::{RaceFrame, RaceSimulation};

/// How ticks are spaced in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    /// One tick per `tick_ms` of wall-clock time
    #[default]
    Realtime,
    /// Ticks back to back, yielding to the executor between them
    Immediate,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared handle that stops an in-flight race
///
/// Cancelling finishes every running horse where it stands and lets the
/// driver resolve with a `Cancelled` result.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

async fn wait_for_cancel(handle: Option<&CancelHandle>) {
    match handle {
        Some(handle) => handle.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Runs stepped races against the clock
#[derive(Debug)]
pub struct RaceDriver {
    config: RaceConfig,
    pace: Pace,
    cancel: Option<CancelHandle>,
    progress: Option<watch::Sender<RaceFrame>>,
}

impl RaceDriver {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            pace: Pace::Realtime,
            cancel: None,
            progress: None,
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Publish a frame after every tick
    pub fn with_progress(mut self, sender: watch::Sender<RaceFrame>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// Run one race to its result
    ///
    /// Invalid races fail before the first tick. Otherwise this always
    /// resolves: the time cap bounds the loop and cancellation ends it early.
    pub async fn run<R: RandomSource + ?Sized>(&self, race: &Race, rng: &mut R) -> Result<RaceResult> {
        let mut sim = RaceSimulation::new(race, &self.config)?;
        let cancel = self.cancel.as_ref();
        self.publish(&sim);

        tracing::debug!(
            round = race.round,
            distance = race.distance,
            pace = ?self.pace,
            max_ticks = self.config.max_ticks(),
            "race started"
        );

        match self.pace {
            Pace::Realtime => {
                let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms));
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // First tick of a tokio interval completes immediately
                interval.tick().await;

                while !sim.is_done() {
                    if cancel.is_some_and(CancelHandle::is_cancelled) {
                        sim.cancel();
                        break;
                    }
                    tokio::select! {
                        _ = interval.tick() => sim.tick(rng)?,
                        _ = wait_for_cancel(cancel) => sim.cancel(),
                    }
                    self.publish(&sim);
                }
            }
            Pace::Immediate => {
                while !sim.is_done() {
                    if cancel.is_some_and(CancelHandle::is_cancelled) {
                        sim.cancel();
                    } else {
                        sim.tick(rng)?;
                    }
                    self.publish(&sim);
                    tokio::task::yield_now().await;
                }
            }
        }

        self.publish(&sim);
        let result = sim.into_result();
        tracing::debug!(
            round = result.round,
            race_time = result.race_time,
            resolution = ?result.resolution,
            "race finished"
        );
        Ok(result)
    }

    fn publish(&self, sim: &RaceSimulation) {
        if let Some(progress) = &self.progress {
            progress.send_replace(sim.frame());
        }
    }
}

/// Run one race in real time with the given physics
pub async fn simulate_race<R: RandomSource + ?Sized>(
    race: &Race,
    config: &RaceConfig,
    rng: &mut R,
) -> Result<RaceResult> {
    RaceDriver::new(config.clone()).run(race, rng).await
}
