//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Lowest valid condition score
pub const MIN_CONDITION: u8 = 1;

/// Highest valid condition score
pub const MAX_CONDITION: u8 = 100;

/// Unique identifier for horses (positive, stable for the horse's lifetime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HorseId(pub u32);

impl std::fmt::Display for HorseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulated time in milliseconds
pub type Millis = u64;

/// One competitor
///
/// Identity fields (`id`, `name`, `color`, `condition`) are fixed at roster
/// creation. The race fields are per-race state owned by whichever race holds
/// this copy of the horse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    /// Display color token (hex string)
    pub color: String,
    /// Inherent ability/form score (1-100)
    pub condition: u8,

    // === RACE STATE ===
    /// Distance covered in the current race (meters)
    pub position: f64,
    /// True only while taking part in the running race
    pub is_racing: bool,
    /// True once the horse reached the distance (or the race was cut off)
    pub finished: bool,
    /// Elapsed simulated time at which the horse finished
    pub finish_time: Option<Millis>,
}

impl Horse {
    pub fn new(id: HorseId, name: impl Into<String>, color: impl Into<String>, condition: u8) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            condition,
            position: 0.0,
            is_racing: false,
            finished: false,
            finish_time: None,
        }
    }

    /// Check identity fields: positive id, non-empty name/color, condition in range
    pub fn is_valid(&self) -> bool {
        self.id.0 > 0
            && !self.name.trim().is_empty()
            && !self.color.trim().is_empty()
            && (MIN_CONDITION..=MAX_CONDITION).contains(&self.condition)
    }

    /// Fresh per-race copy: identity kept, race state cleared
    pub fn entrant(&self) -> Self {
        Self {
            position: 0.0,
            is_racing: false,
            finished: false,
            finish_time: None,
            ..self.clone()
        }
    }

    /// Mark the horse as crossing (or being held at) its final position
    pub(crate) fn finish_at(&mut self, position: f64, elapsed: Millis) {
        self.position = position;
        self.finished = true;
        self.finish_time = Some(elapsed);
    }
}

/// One scheduled contest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    /// 1-based position in the schedule
    pub round: u32,
    /// Race distance in meters
    pub distance: f64,
    /// Per-race copies of the selected horses
    pub horses: Vec<Horse>,
}

impl Race {
    pub fn new(round: u32, distance: f64, horses: Vec<Horse>) -> Self {
        Self { round, distance, horses }
    }

    pub fn horse_ids(&self) -> Vec<HorseId> {
        self.horses.iter().map(|h| h.id).collect()
    }
}

/// Ordered races, generated once before racing begins
pub type Schedule = Vec<Race>;

#[cfg(test)]
mod tests {
    use super::*;

    fn horse() -> Horse {
        Horse::new(HorseId(1), "Thunder Bolt", "#8B4513", 80)
    }

    #[test]
    fn test_valid_horse() {
        assert!(horse().is_valid());
    }

    #[test]
    fn test_invalid_horses() {
        let mut h = horse();
        h.id = HorseId(0);
        assert!(!h.is_valid());

        let mut h = horse();
        h.name = "  ".into();
        assert!(!h.is_valid());

        let mut h = horse();
        h.color = String::new();
        assert!(!h.is_valid());

        let mut h = horse();
        h.condition = 0;
        assert!(!h.is_valid());

        let mut h = horse();
        h.condition = 101;
        assert!(!h.is_valid());
    }

    #[test]
    fn test_entrant_resets_race_state() {
        let mut h = horse();
        h.position = 512.0;
        h.is_racing = true;
        h.finish_at(1200.0, 4800);

        let fresh = h.entrant();
        assert_eq!(fresh.position, 0.0);
        assert!(!fresh.is_racing);
        assert!(!fresh.finished);
        assert_eq!(fresh.finish_time, None);
        assert_eq!(fresh.id, h.id);
        assert_eq!(fresh.condition, h.condition);
    }

    #[test]
    fn test_race_horse_ids() {
        let race = Race::new(1, 1200.0, vec![horse(), Horse::new(HorseId(2), "Silver Arrow", "#A0522D", 40)]);
        assert_eq!(race.horse_ids(), vec![HorseId(1), HorseId(2)]);
    }
}
