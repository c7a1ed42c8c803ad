//! Race results and ranking

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::{Horse, HorseId, Millis};

/// How a race reached its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Stepped until every horse crossed the line
    Completed,
    /// Stepped until the time cap; stragglers held at their positions
    TimedOut,
    /// Stepped until cancelled; unfinished horses held at their positions
    Cancelled,
    /// Resolved in one pass without stepping
    Skipped,
}

/// Outcome of one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub round: u32,
    pub distance: f64,
    /// Horses in finishing order (index 0 = winner)
    pub horses: Vec<Horse>,
    /// Simulated time when the race concluded
    pub race_time: Millis,
    pub resolution: Resolution,
}

impl RaceResult {
    /// First-placed horse
    pub fn winner(&self) -> Option<&Horse> {
        self.horses.first()
    }

    /// 1-based finishing place of a horse, if it ran
    pub fn placing(&self, id: HorseId) -> Option<usize> {
        self.horses.iter().position(|h| h.id == id).map(|i| i + 1)
    }

    pub fn summary(&self) -> String {
        let winner = self
            .winner()
            .map(|h| format!("{} ({})", h.name, h.id))
            .unwrap_or_else(|| "nobody".to_string());
        format!(
            "Round {} - {}m: won by {} in {:.1}s [{:?}]",
            self.round,
            self.distance,
            winner,
            self.race_time as f64 / 1000.0,
            self.resolution,
        )
    }
}

/// Finishing order for stepped races
///
/// Earlier finish time ranks first. Horses held at the time cap share a
/// finish time, so they are split by distance covered. Anything still tied
/// keeps its entry order.
pub(crate) fn by_finish_time(a: &Horse, b: &Horse) -> Ordering {
    let key = |h: &Horse| h.finish_time.unwrap_or(Millis::MAX);
    key(a)
        .cmp(&key(b))
        .then_with(|| b.position.total_cmp(&a.position))
}

/// Finishing order for skipped races: furthest position first
pub(crate) fn by_position(a: &Horse, b: &Horse) -> Ordering {
    b.position.total_cmp(&a.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(id: u32, position: f64, time: Option<Millis>) -> Horse {
        let mut horse = Horse::new(HorseId(id), format!("Horse {}", id), "#FFFFFF", 50);
        horse.position = position;
        horse.finished = time.is_some();
        horse.finish_time = time;
        horse
    }

    #[test]
    fn test_finish_time_ordering_is_stable() {
        let mut horses = vec![
            finished(1, 1000.0, Some(900)),
            finished(2, 1000.0, Some(800)),
            finished(3, 1000.0, Some(900)),
            finished(4, 400.0, None),
        ];
        horses.sort_by(by_finish_time);
        let ids: Vec<u32> = horses.iter().map(|h| h.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_capped_horses_split_by_position() {
        let mut horses = vec![
            finished(1, 300.0, Some(3000)),
            finished(2, 1000.0, Some(2500)),
            finished(3, 700.0, Some(3000)),
        ];
        horses.sort_by(by_finish_time);
        let ids: Vec<u32> = horses.iter().map(|h| h.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_placing_and_winner() {
        let result = RaceResult {
            round: 2,
            distance: 1400.0,
            horses: vec![finished(7, 1400.0, Some(700)), finished(3, 1400.0, Some(800))],
            race_time: 800,
            resolution: Resolution::Completed,
        };
        assert_eq!(result.winner().map(|h| h.id), Some(HorseId(7)));
        assert_eq!(result.placing(HorseId(3)), Some(2));
        assert_eq!(result.placing(HorseId(99)), None);
        assert!(result.summary().contains("Round 2"));
    }
}
