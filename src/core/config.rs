//! Game configuration with documented constants
//!
//! Every tunable number of the game lives here. Defaults reproduce the
//! reference game: 20 horses, 6 rounds of 10 runners, 100ms ticks.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{DerbyError, Result};
use crate::core::types::Millis;

/// Default location of the game configuration file
pub const DEFAULT_CONFIG_PATH: &str = "data/derby.toml";

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub race: RaceConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Roster generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Number of horses generated per game session
    pub size: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { size: 20 }
    }
}

/// Schedule shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Distance of each round in meters; one round per entry
    pub distances: Vec<f64>,
    /// Runners drawn from the roster for each round
    pub horses_per_race: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            distances: vec![1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0],
            horses_per_race: 10,
        }
    }
}

impl ScheduleConfig {
    pub fn rounds(&self) -> usize {
        self.distances.len()
    }
}

/// Stepped race physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Simulated milliseconds per tick
    pub tick_ms: Millis,

    /// Hard cap on simulated race time
    ///
    /// Horses still running when the cap is reached are finished where they
    /// stand. This bounds the loop no matter how the draws fall.
    pub max_race_ms: Millis,

    /// Meters covered per tick by a horse at speed 1.0
    ///
    /// At 20m, a top-condition horse running flat out covers 1200m in
    /// 60 ticks (6 simulated seconds).
    pub stride_meters: f64,

    /// Range of synthetic finish times handed out by skip resolution
    pub skip_finish_ms: [Millis; 2],
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            max_race_ms: 30_000,
            stride_meters: 20.0,
            skip_finish_ms: [5_000, 10_000],
        }
    }
}

impl RaceConfig {
    /// Maximum number of ticks a race can run
    pub fn max_ticks(&self) -> u64 {
        if self.tick_ms == 0 {
            0
        } else {
            self.max_race_ms.div_ceil(self.tick_ms)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(DerbyError::Config("race.tick_ms must be positive".into()));
        }
        if self.max_race_ms < self.tick_ms {
            return Err(DerbyError::Config(format!(
                "race.max_race_ms ({}) must be at least one tick ({})",
                self.max_race_ms, self.tick_ms
            )));
        }
        if !(self.stride_meters.is_finite() && self.stride_meters > 0.0) {
            return Err(DerbyError::Config("race.stride_meters must be positive".into()));
        }
        let [low, high] = self.skip_finish_ms;
        if low > high {
            return Err(DerbyError::Config(format!(
                "race.skip_finish_ms range is inverted ({} > {})",
                low, high
            )));
        }
        Ok(())
    }
}

/// Session pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between consecutive rounds when running the whole schedule
    pub round_pause_ms: Millis,
    /// Seed for the session RNG; a random seed is chosen when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_pause_ms: 2_000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.roster.size == 0 {
            return Err(DerbyError::Config("roster.size must be positive".into()));
        }
        if self.schedule.distances.is_empty() {
            return Err(DerbyError::Config("schedule.distances must not be empty".into()));
        }
        if let Some(bad) = self
            .schedule
            .distances
            .iter()
            .find(|d| !(d.is_finite() && **d > 0.0))
        {
            return Err(DerbyError::Config(format!(
                "schedule.distances must be positive, found {}",
                bad
            )));
        }
        if self.schedule.horses_per_race == 0 {
            return Err(DerbyError::Config("schedule.horses_per_race must be positive".into()));
        }
        if self.schedule.horses_per_race > self.roster.size {
            return Err(DerbyError::Config(format!(
                "schedule.horses_per_race ({}) exceeds roster.size ({})",
                self.schedule.horses_per_race, self.roster.size
            )));
        }
        self.race.validate()
    }
}

/// Load and validate a configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!("Loaded game config from {:?}", path);
    Ok(config)
}

/// Parse and validate a configuration from TOML text
pub fn parse_config(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Path of the default config file
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}
