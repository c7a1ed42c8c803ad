pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::GameConfig;
pub use error::{DerbyError, Result};
pub use rng::{RandomSource, SequenceSource};
pub use types::{Horse, HorseId, Race, Schedule};
