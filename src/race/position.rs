//! Position integrator - one step of progress along the track

use crate::core::error::{DerbyError, Result};

/// Advance a position by one step of a race split into `total_steps` steps
///
/// A horse at speed 1.0 for all `total_steps` steps covers `distance`:
/// exactly when `distance / total_steps` is representable, otherwise within
/// `total_steps` ulps of rounding. Clamping to the finish line is left to
/// the caller.
pub fn advance(position: f64, speed: f64, distance: f64, total_steps: u32) -> Result<f64> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(DerbyError::invalid(format!(
            "distance must be positive, got {}",
            distance
        )));
    }
    if total_steps == 0 {
        return Err(DerbyError::invalid("total steps must be positive"));
    }
    advance_by(position, speed, distance / f64::from(total_steps))
}

/// Advance a position by `speed * step_length`
pub fn advance_by(position: f64, speed: f64, step_length: f64) -> Result<f64> {
    if position.is_nan() || position < 0.0 {
        return Err(DerbyError::invalid(format!(
            "position cannot be negative, got {}",
            position
        )));
    }
    if speed.is_nan() || speed < 0.0 {
        return Err(DerbyError::invalid(format!(
            "speed cannot be negative, got {}",
            speed
        )));
    }
    if !(step_length.is_finite() && step_length > 0.0) {
        return Err(DerbyError::invalid(format!(
            "step length must be positive, got {}",
            step_length
        )));
    }
    Ok(position + speed * step_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_step() {
        // 100 + 0.5 * (1000 / 50)
        assert_eq!(advance(100.0, 0.5, 1000.0, 50).unwrap(), 110.0);
    }

    #[test]
    fn test_full_speed_covers_distance() {
        let mut position = 0.0;
        for _ in 0..16 {
            position = advance(position, 1.0, 1200.0, 16).unwrap();
        }
        assert_eq!(position, 1200.0);
    }

    #[test]
    fn test_full_speed_covers_inexact_steps() {
        // 0.1 has no exact binary form, so the sum carries rounding error
        let mut position = 0.0;
        for _ in 0..10 {
            position = advance(position, 1.0, 1.0, 10).unwrap();
        }
        assert!((position - 1.0).abs() <= 10.0 * f64::EPSILON);

        let mut position = 0.0;
        for _ in 0..3 {
            position = advance(position, 1.0, 1000.0, 3).unwrap();
        }
        assert!((position - 1000.0).abs() <= 3.0 * 1000.0 * f64::EPSILON);
    }

    #[test]
    fn test_zero_speed_holds_position() {
        assert_eq!(advance(42.0, 0.0, 1000.0, 10).unwrap(), 42.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(advance(-1.0, 0.5, 1000.0, 50), Err(DerbyError::InvalidArgument(_))));
        assert!(advance(100.0, -0.5, 1000.0, 50).is_err());
        assert!(advance(100.0, 0.5, 0.0, 50).is_err());
        assert!(advance(100.0, 0.5, 1000.0, 0).is_err());
        assert!(advance_by(0.0, 0.5, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn advance_never_moves_backwards(
            position in 0.0f64..10_000.0,
            speed in 0.0f64..=1.0,
            distance in 1.0f64..5_000.0,
            steps in 1u32..1_000,
        ) {
            let next = advance(position, speed, distance, steps).unwrap();
            prop_assert!(next >= position);
        }
    }
}
