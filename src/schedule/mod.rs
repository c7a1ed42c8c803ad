//! Roster and schedule generation

pub mod generator;
pub mod roster;
pub mod selector;

pub use generator::generate_schedule;
pub use roster::{generate_roster, HORSE_COLORS, HORSE_NAMES};
pub use selector::sample;
