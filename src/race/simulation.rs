//! Stepped race simulation
//!
//! A race is a small state machine: `tick()` advances every running horse by
//! one step, `is_done()` reports the terminal condition. Whoever owns the
//! simulation decides how ticks are paced (see `driver`), so the same stepping
//! logic serves the real-time UI, headless runs, and tests.
//!
//! Per tick, each unfinished horse draws fresh luck, gets a speed from the
//! speed model, and moves `speed * stride_meters`. Reaching the distance
//! clamps the horse to the line and records the elapsed time. The race ends
//! when everyone has finished or the time cap is hit, whichever comes first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::config::RaceConfig;
use crate::core::error::{DerbyError, Result};
use crate::core::rng::RandomSource;
use crate::core::types::{Horse, HorseId, Millis, Race, MAX_CONDITION, MIN_CONDITION};
use crate::race::position::advance_by;
use crate::race::result::{by_finish_time, RaceResult, Resolution};
use crate::race::speed::speed;

/// Snapshot of one horse mid-race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorseProgress {
    pub id: HorseId,
    pub position: f64,
    pub finished: bool,
}

/// Snapshot of a race after a tick, for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceFrame {
    pub round: u32,
    pub distance: f64,
    pub elapsed_ms: Millis,
    pub horses: Vec<HorseProgress>,
}

/// In-flight stepped race
#[derive(Debug, Clone)]
pub struct RaceSimulation {
    round: u32,
    distance: f64,
    horses: Vec<Horse>,
    config: RaceConfig,
    elapsed: Millis,
    outcome: Option<Resolution>,
}

impl RaceSimulation {
    /// Set up a race: every entrant starts at 0, unfinished, racing
    ///
    /// Fails without side effects when the field is empty, the distance is
    /// not positive, a horse has an out-of-range condition, ids repeat, or the
    /// race config is inconsistent.
    pub fn new(race: &Race, config: &RaceConfig) -> Result<Self> {
        validate_race(race)?;
        config.validate()?;

        let horses = race
            .horses
            .iter()
            .map(|h| {
                let mut entrant = h.entrant();
                entrant.is_racing = true;
                entrant
            })
            .collect();

        Ok(Self {
            round: race.round,
            distance: race.distance,
            horses,
            config: config.clone(),
            elapsed: 0,
            outcome: None,
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn elapsed(&self) -> Millis {
        self.elapsed
    }

    /// Horses in entry order with their current race state
    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance the race by one tick. No-op once the race is done.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.is_done() {
            return Ok(());
        }

        // Draw every move first so a rejected draw leaves the race untouched
        let mut moves = Vec::with_capacity(self.horses.len());
        for (index, horse) in self.horses.iter().enumerate().filter(|(_, h)| !h.finished) {
            let draw = rng.next_unit();
            let horse_speed = speed(horse.condition, draw)?;
            let next = advance_by(horse.position, horse_speed, self.config.stride_meters)?;
            moves.push((index, next));
        }

        self.elapsed = self
            .elapsed
            .saturating_add(self.config.tick_ms)
            .min(self.config.max_race_ms);
        let elapsed = self.elapsed;

        for (index, next) in moves {
            let horse = &mut self.horses[index];
            if next >= self.distance {
                horse.finish_at(self.distance, elapsed);
                tracing::trace!(round = self.round, horse = %horse.id, elapsed, "crossed the line");
            } else {
                horse.position = next;
            }
        }

        if self.horses.iter().all(|h| h.finished) {
            self.outcome = Some(Resolution::Completed);
        } else if self.elapsed >= self.config.max_race_ms {
            self.hold_remaining();
            self.outcome = Some(Resolution::TimedOut);
            tracing::debug!(round = self.round, elapsed, "race hit the time cap");
        }

        Ok(())
    }

    /// Stop the race now, finishing every running horse where it stands
    pub fn cancel(&mut self) {
        if self.is_done() {
            return;
        }
        self.hold_remaining();
        self.outcome = Some(Resolution::Cancelled);
        tracing::debug!(round = self.round, elapsed = self.elapsed, "race cancelled");
    }

    pub fn frame(&self) -> RaceFrame {
        RaceFrame {
            round: self.round,
            distance: self.distance,
            elapsed_ms: self.elapsed,
            horses: self
                .horses
                .iter()
                .map(|h| HorseProgress {
                    id: h.id,
                    position: h.position,
                    finished: h.finished,
                })
                .collect(),
        }
    }

    /// Rank the field and produce the result
    ///
    /// A race that is not done yet is cancelled first.
    pub fn into_result(mut self) -> RaceResult {
        self.cancel();

        let mut horses = self.horses;
        for horse in &mut horses {
            horse.is_racing = false;
        }
        horses.sort_by(by_finish_time);

        RaceResult {
            round: self.round,
            distance: self.distance,
            horses,
            race_time: self.elapsed,
            resolution: self.outcome.unwrap_or(Resolution::Cancelled),
        }
    }

    /// Step synchronously until the race is done
    pub fn run_to_completion<R: RandomSource + ?Sized>(mut self, rng: &mut R) -> Result<RaceResult> {
        while !self.is_done() {
            self.tick(rng)?;
        }
        Ok(self.into_result())
    }

    fn hold_remaining(&mut self) {
        let elapsed = self.elapsed;
        for horse in self.horses.iter_mut().filter(|h| !h.finished) {
            let position = horse.position;
            horse.finish_at(position, elapsed);
        }
    }
}

/// Run a whole race without pacing
pub fn simulate_race_now<R: RandomSource + ?Sized>(
    race: &Race,
    config: &RaceConfig,
    rng: &mut R,
) -> Result<RaceResult> {
    RaceSimulation::new(race, config)?.run_to_completion(rng)
}

/// Preconditions shared by stepped and skipped resolution
pub(crate) fn validate_race(race: &Race) -> Result<()> {
    if race.horses.is_empty() {
        return Err(DerbyError::invalid("race needs at least one horse"));
    }
    if !(race.distance.is_finite() && race.distance > 0.0) {
        return Err(DerbyError::invalid(format!(
            "race distance must be positive, got {}",
            race.distance
        )));
    }

    let mut seen = HashSet::with_capacity(race.horses.len());
    for horse in &race.horses {
        if !(MIN_CONDITION..=MAX_CONDITION).contains(&horse.condition) {
            return Err(DerbyError::invalid(format!(
                "horse {} has condition {} outside {}-{}",
                horse.id, horse.condition, MIN_CONDITION, MAX_CONDITION
            )));
        }
        if !seen.insert(horse.id) {
            return Err(DerbyError::invalid(format!("horse {} entered twice", horse.id)));
        }
    }
    Ok(())
}
