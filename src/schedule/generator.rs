//! Schedule generation

use crate::core::error::{DerbyError, Result};
use crate::core::rng::RandomSource;
use crate::core::types::{Horse, Race, Schedule};
use crate::schedule::selector::sample;

/// Build one race per distance, each with an independent random field
///
/// Round numbers follow the distance list (1-based). Every race gets fresh
/// copies of its horses, so nothing a race does leaks back into the roster
/// or into other rounds. A horse may run in several rounds or none.
pub fn generate_schedule<R: RandomSource + ?Sized>(
    roster: &[Horse],
    distances: &[f64],
    horses_per_race: usize,
    rng: &mut R,
) -> Result<Schedule> {
    if horses_per_race == 0 {
        return Err(DerbyError::invalid("horses per race must be positive"));
    }
    if horses_per_race > roster.len() {
        return Err(DerbyError::invalid(format!(
            "horses per race ({}) exceeds roster size ({})",
            horses_per_race,
            roster.len()
        )));
    }
    if let Some(bad) = distances.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(DerbyError::invalid(format!(
            "race distances must be positive, found {}",
            bad
        )));
    }

    let mut schedule = Vec::with_capacity(distances.len());
    for (index, &distance) in distances.iter().enumerate() {
        let field = sample(roster, horses_per_race, rng)?
            .iter()
            .map(Horse::entrant)
            .collect();
        schedule.push(Race::new(index as u32 + 1, distance, field));
    }

    tracing::info!(
        "Generated schedule: {} rounds of {} horses",
        schedule.len(),
        horses_per_race
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::roster::generate_roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const DISTANCES: [f64; 6] = [1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0];

    #[test]
    fn test_reference_schedule_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let roster = generate_roster(20, &mut rng).unwrap();
        let schedule = generate_schedule(&roster, &DISTANCES, 10, &mut rng).unwrap();

        assert_eq!(schedule.len(), 6);
        for (i, race) in schedule.iter().enumerate() {
            assert_eq!(race.round, i as u32 + 1);
            assert_eq!(race.distance, DISTANCES[i]);
            assert_eq!(race.horses.len(), 10);
            let ids: HashSet<_> = race.horse_ids().into_iter().collect();
            assert_eq!(ids.len(), 10);
            assert!(race.horses.iter().all(|h| h.position == 0.0 && !h.is_racing));
        }
    }

    #[test]
    fn test_entrants_are_fresh_copies() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut roster = generate_roster(4, &mut rng).unwrap();
        for horse in &mut roster {
            horse.position = 77.0;
            horse.is_racing = true;
        }
        let schedule = generate_schedule(&roster, &[1000.0], 4, &mut rng).unwrap();
        assert!(schedule[0].horses.iter().all(|h| h.position == 0.0 && !h.is_racing));
        assert!(roster.iter().all(|h| h.position == 77.0));
    }

    #[test]
    fn test_empty_distances_give_empty_schedule() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let roster = generate_roster(5, &mut rng).unwrap();
        assert!(generate_schedule(&roster, &[], 3, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let roster = generate_roster(5, &mut rng).unwrap();
        assert!(matches!(
            generate_schedule(&roster, &DISTANCES, 0, &mut rng),
            Err(DerbyError::InvalidArgument(_))
        ));
        assert!(generate_schedule(&roster, &DISTANCES, 6, &mut rng).is_err());
        assert!(generate_schedule(&roster, &[1200.0, -1.0], 3, &mut rng).is_err());
    }
}
