//! Roster generation

use crate::core::error::{DerbyError, Result};
use crate::core::rng::RandomSource;
use crate::core::types::{Horse, HorseId, MAX_CONDITION};

/// Stable names handed out in roster order
pub const HORSE_NAMES: [&str; 20] = [
    "Thunder Bolt",
    "Silver Arrow",
    "Golden Star",
    "Midnight Run",
    "Fire Storm",
    "Ocean Wave",
    "Mountain Peak",
    "Desert Wind",
    "Forest Shadow",
    "River Flow",
    "Lightning Flash",
    "Storm Cloud",
    "Sun Ray",
    "Moon Beam",
    "Star Light",
    "Wind Rider",
    "Earth Shaker",
    "Sky Dancer",
    "Sea Spirit",
    "Flame Runner",
];

/// Coat colors handed out in roster order
pub const HORSE_COLORS: [&str; 20] = [
    "#8B4513", "#A0522D", "#CD853F", "#D2691E", "#B8860B",
    "#DAA520", "#F4A460", "#DEB887", "#F5DEB3", "#FFE4B5",
    "#8B7355", "#A0522D", "#CD853F", "#D2691E", "#B8860B",
    "#DAA520", "#F4A460", "#DEB887", "#F5DEB3", "#FFE4B5",
];

/// Generate `size` horses with ids 1..=size and random condition
///
/// Names repeat with a numeric suffix once the name table runs out.
pub fn generate_roster<R: RandomSource + ?Sized>(size: usize, rng: &mut R) -> Result<Vec<Horse>> {
    if size == 0 {
        return Err(DerbyError::invalid("roster size must be positive"));
    }
    let last_id = u32::try_from(size)
        .map_err(|_| DerbyError::invalid(format!("roster size {} is too large", size)))?;

    let roster: Vec<Horse> = (1..=last_id)
        .map(|id| {
            let slot = (id - 1) as usize;
            let lap = slot / HORSE_NAMES.len();
            let base = HORSE_NAMES[slot % HORSE_NAMES.len()];
            let name = if lap == 0 {
                base.to_string()
            } else {
                format!("{} {}", base, lap + 1)
            };
            let color = HORSE_COLORS[slot % HORSE_COLORS.len()];
            let condition = rng.next_below(usize::from(MAX_CONDITION)) as u8 + 1;
            Horse::new(HorseId(id), name, color, condition)
        })
        .collect();

    tracing::info!("Generated roster of {} horses", roster.len());
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SequenceSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_reference_roster() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let roster = generate_roster(20, &mut rng).unwrap();

        assert_eq!(roster.len(), 20);
        assert!(roster.iter().all(Horse::is_valid));
        let ids: HashSet<_> = roster.iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), 20);
        let names: HashSet<_> = roster.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names.len(), 20);
        assert_eq!(roster[0].id, HorseId(1));
        assert_eq!(roster[0].name, "Thunder Bolt");
        assert_eq!(roster[19].name, "Flame Runner");
    }

    #[test]
    fn test_condition_extremes() {
        let roster = generate_roster(3, &mut SequenceSource::constant(0.0)).unwrap();
        assert!(roster.iter().all(|h| h.condition == 1));

        let roster = generate_roster(3, &mut SequenceSource::constant(1.0)).unwrap();
        assert!(roster.iter().all(|h| h.condition == 100));
    }

    #[test]
    fn test_names_cycle_with_suffix() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roster = generate_roster(45, &mut rng).unwrap();
        assert_eq!(roster[20].name, "Thunder Bolt 2");
        assert_eq!(roster[44].name, "Fire Storm 3");
        let names: HashSet<_> = roster.iter().map(|h| h.name.clone()).collect();
        assert_eq!(names.len(), 45);
    }

    #[test]
    fn test_empty_roster_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(generate_roster(0, &mut rng), Err(DerbyError::InvalidArgument(_))));
    }
}
