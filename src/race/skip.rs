//! Accelerated race resolution
//!
//! Skipping resolves a race in one pass over the field instead of stepping
//! it: each horse gets a single luck draw, a final position of
//! `distance * speed(condition, luck)`, and a synthetic finish time from the
//! configured range. Skipped races rank by position, not by finish time, so
//! the synthetic times are for display only.

use crate::core::config::RaceConfig;
use crate::core::error::{DerbyError, Result};
use crate::core::rng::RandomSource;
use crate::core::types::{Millis, Race};
use crate::race::result::{by_position, RaceResult, Resolution};
use crate::race::simulation::validate_race;
use crate::race::speed::speed;

/// Resolve one race without stepping
pub fn skip_race<R: RandomSource + ?Sized>(
    race: &Race,
    config: &RaceConfig,
    rng: &mut R,
) -> Result<RaceResult> {
    validate_race(race)?;
    config.validate()?;

    let [low, high] = config.skip_finish_ms;
    let mut horses = Vec::with_capacity(race.horses.len());
    for horse in &race.horses {
        let mut entrant = horse.entrant();
        let luck = rng.next_unit();
        let position = race.distance * speed(entrant.condition, luck)?;
        let finish_time = low + ((high - low) as f64 * rng.next_unit()).round() as Millis;
        entrant.finish_at(position, finish_time);
        horses.push(entrant);
    }

    horses.sort_by(by_position);
    let race_time = horses
        .iter()
        .filter_map(|h| h.finish_time)
        .max()
        .unwrap_or(low);

    tracing::debug!(round = race.round, "race skipped");

    Ok(RaceResult {
        round: race.round,
        distance: race.distance,
        horses,
        race_time,
        resolution: Resolution::Skipped,
    })
}

/// Skip every race from `from_round` (inclusive) to the end, in round order
pub fn skip_remaining<R: RandomSource + ?Sized>(
    schedule: &[Race],
    from_round: u32,
    config: &RaceConfig,
    rng: &mut R,
) -> Result<Vec<RaceResult>> {
    if from_round == 0 {
        return Err(DerbyError::invalid("rounds are numbered from 1"));
    }

    let mut pending: Vec<&Race> = schedule.iter().filter(|r| r.round >= from_round).collect();
    pending.sort_by_key(|r| r.round);
    for race in &pending {
        validate_race(race)?;
    }

    pending
        .into_iter()
        .map(|race| skip_race(race, config, rng))
        .collect()
}
