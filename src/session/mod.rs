//! Game session - the orchestration context around the race engine
//!
//! A `GameSession` owns everything one game needs: config, RNG, roster,
//! schedule, and the results accumulated so far. The engine functions stay
//! stateless; the session feeds them and records what they return.
//!
//! Flow: `new` (roster generated) -> `generate_schedule` -> `start` ->
//! `run_next_round` / `skip_race` / `skip_to_end` until `is_complete`.
//! Rounds always resolve in order, one at a time.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::GameConfig;
use crate::core::error::{DerbyError, Result};
use crate::core::types::{Horse, HorseId, Race, Schedule};
use crate::race::driver::{Pace, RaceDriver};
use crate::race::result::RaceResult;
use crate::race::skip::{skip_race, skip_remaining};
use crate::schedule::generator::generate_schedule;
use crate::schedule::roster::generate_roster;

/// State of one game
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    roster: Vec<Horse>,
    schedule: Schedule,
    results: Vec<RaceResult>,
    /// Round to run next (1-based); 0 before the game starts
    current_round: u32,
    horses_generated: bool,
    schedule_generated: bool,
    game_started: bool,
    is_racing: bool,
}

impl GameSession {
    /// Create a session and generate its roster
    ///
    /// Uses `session.seed` from the config, or a random seed when absent.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.session.seed.unwrap_or_else(rand::random);

        let mut session = Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            roster: Vec::new(),
            schedule: Vec::new(),
            results: Vec::new(),
            current_round: 0,
            horses_generated: false,
            schedule_generated: false,
            game_started: false,
            is_racing: false,
        };
        session.initialize()?;
        Ok(session)
    }

    /// Start over with a fresh roster; schedule and results are dropped
    pub fn initialize(&mut self) -> Result<()> {
        let roster = generate_roster(self.config.roster.size, &mut self.rng)?;

        self.roster = roster;
        self.schedule.clear();
        self.results.clear();
        self.current_round = 0;
        self.horses_generated = true;
        self.schedule_generated = false;
        self.game_started = false;
        self.is_racing = false;

        tracing::info!(seed = self.seed, "Session initialized");
        Ok(())
    }

    /// Throw away the current game and begin a new one
    pub fn reset(&mut self) -> Result<()> {
        tracing::info!("Session reset after {} results", self.results.len());
        self.initialize()
    }

    /// Build (or rebuild) the schedule from the current roster
    pub fn generate_schedule(&mut self) -> Result<&Schedule> {
        if !self.can_generate_schedule() {
            return Err(DerbyError::InvalidState(
                "schedule can only be generated before the game starts".into(),
            ));
        }

        let schedule = generate_schedule(
            &self.roster,
            &self.config.schedule.distances,
            self.config.schedule.horses_per_race,
            &mut self.rng,
        )?;
        self.schedule = schedule;
        self.schedule_generated = true;
        Ok(&self.schedule)
    }

    /// Lock the schedule and move to round 1
    pub fn start(&mut self) -> Result<()> {
        if !self.can_start_race() {
            return Err(DerbyError::InvalidState(
                "game needs a schedule and must not already be running".into(),
            ));
        }
        self.game_started = true;
        self.current_round = 1;
        tracing::info!("Game started: {} rounds", self.rounds());
        Ok(())
    }

    /// Run the current round through the stepped driver and record its result
    ///
    /// Dropping the returned future abandons the round: racing flags are
    /// cleared and the same round stays due.
    pub async fn run_next_round(&mut self, driver: &RaceDriver) -> Result<&RaceResult> {
        let race = self.next_race()?;

        let outcome = {
            let _racing = RacingGuard::enter(&mut self.roster, &mut self.is_racing, race.horse_ids());
            driver.run(&race, &mut self.rng).await
        };

        self.record(outcome?)
    }

    /// Run every remaining round in order
    ///
    /// With a real-time driver, rounds are separated by
    /// `session.round_pause_ms`. Starts the game if needed.
    pub async fn run_all(&mut self, driver: &RaceDriver) -> Result<&[RaceResult]> {
        if !self.game_started {
            self.start()?;
        }
        let pause = Duration::from_millis(self.config.session.round_pause_ms);

        while !self.is_complete() {
            self.run_next_round(driver).await?;
            if !self.is_complete() && driver.pace() == Pace::Realtime && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        Ok(&self.results)
    }

    /// Resolve the current round without stepping
    pub fn skip_race(&mut self) -> Result<&RaceResult> {
        let race = self.next_race()?;
        let result = skip_race(&race, &self.config.race, &mut self.rng)?;
        self.record(result)
    }

    /// Resolve every remaining round without stepping. Starts the game if needed.
    pub fn skip_to_end(&mut self) -> Result<&[RaceResult]> {
        if !self.game_started {
            self.start()?;
        }
        if self.is_racing {
            return Err(DerbyError::InvalidState("a race is already running".into()));
        }

        let skipped = skip_remaining(&self.schedule, self.current_round, &self.config.race, &mut self.rng)?;
        for result in skipped {
            self.record(result)?;
        }
        Ok(&self.results)
    }

    // === QUERIES ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn roster(&self) -> &[Horse] {
        &self.roster
    }

    pub fn horse(&self, id: HorseId) -> Option<&Horse> {
        self.roster.iter().find(|h| h.id == id)
    }

    /// Roster horses not taking part in the running race
    pub fn available_horses(&self) -> impl Iterator<Item = &Horse> {
        self.roster.iter().filter(|h| !h.is_racing)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn results(&self) -> &[RaceResult] {
        &self.results
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn rounds(&self) -> u32 {
        self.schedule.len() as u32
    }

    /// Race for the current round, if the game is under way
    pub fn current_race(&self) -> Option<&Race> {
        let index = self.current_round.checked_sub(1)? as usize;
        self.schedule.get(index)
    }

    pub fn horses_generated(&self) -> bool {
        self.horses_generated
    }

    pub fn schedule_generated(&self) -> bool {
        self.schedule_generated
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn is_racing(&self) -> bool {
        self.is_racing
    }

    pub fn can_generate_schedule(&self) -> bool {
        self.horses_generated && !self.game_started
    }

    pub fn can_start_race(&self) -> bool {
        self.schedule_generated && !self.game_started
    }

    pub fn is_complete(&self) -> bool {
        self.game_started && self.current_round > self.rounds() && !self.is_racing
    }

    // === INTERNALS ===

    fn next_race(&self) -> Result<Race> {
        if !self.game_started {
            return Err(DerbyError::InvalidState("game has not started".into()));
        }
        if self.is_racing {
            return Err(DerbyError::InvalidState("a race is already running".into()));
        }
        self.current_race()
            .cloned()
            .ok_or_else(|| DerbyError::InvalidState("all rounds have been run".into()))
    }

    fn record(&mut self, result: RaceResult) -> Result<&RaceResult> {
        if result.round != self.current_round {
            return Err(DerbyError::InvalidState(format!(
                "result for round {} arrived while round {} was due",
                result.round, self.current_round
            )));
        }

        tracing::info!("{}", result.summary());
        self.results.push(result);
        self.current_round += 1;
        Ok(&self.results[self.results.len() - 1])
    }
}

/// Marks a field as racing for as long as it lives
struct RacingGuard<'a> {
    roster: &'a mut [Horse],
    is_racing: &'a mut bool,
    ids: Vec<HorseId>,
}

impl<'a> RacingGuard<'a> {
    fn enter(roster: &'a mut [Horse], is_racing: &'a mut bool, ids: Vec<HorseId>) -> Self {
        let mut guard = Self { roster, is_racing, ids };
        guard.mark(true);
        guard
    }

    fn mark(&mut self, racing: bool) {
        for horse in self.roster.iter_mut().filter(|h| self.ids.contains(&h.id)) {
            horse.is_racing = racing;
        }
        *self.is_racing = racing;
    }
}

impl Drop for RacingGuard<'_> {
    fn drop(&mut self) {
        self.mark(false);
    }
}
