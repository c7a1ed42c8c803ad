//! Derby - Horse Racing Simulation

pub mod core;
pub mod race;
pub mod schedule;
pub mod session;

pub use crate::core::{DerbyError, GameConfig, Horse, HorseId, Race, Result};
pub use crate::race::{RaceResult, Resolution};
pub use crate::session::GameSession;
