//! Race engine
//!
//! Leaves first: `speed` and `position` are pure functions, `simulation`
//! steps a field of horses to a ranked result, `driver` paces that stepping
//! on the async runtime, and `skip` resolves a race in a single pass.

pub mod driver;
pub mod position;
pub mod result;
pub mod simulation;
pub mod skip;
pub mod speed;

pub use driver::{simulate_race, CancelHandle, Pace, RaceDriver};
pub use position::{advance, advance_by};
pub use result::{RaceResult, Resolution};
pub use simulation::{simulate_race_now, HorseProgress, RaceFrame, RaceSimulation};
pub use skip::{skip_race, skip_remaining};
pub use speed::speed;
