//! Speed model - condition and luck to instantaneous speed

use crate::core::error::{DerbyError, Result};
use crate::core::types::{MAX_CONDITION, MIN_CONDITION};

/// Instantaneous speed multiplier for a horse
///
/// `condition / 100` scaled by a random variation in [0.5, 1.0], so the
/// result lies in (0.005, 1.0].
pub fn speed(condition: u8, random_draw: f64) -> Result<f64> {
    if !(MIN_CONDITION..=MAX_CONDITION).contains(&condition) {
        return Err(DerbyError::invalid(format!(
            "condition must be between {} and {}, got {}",
            MIN_CONDITION, MAX_CONDITION, condition
        )));
    }
    if !(0.0..=1.0).contains(&random_draw) {
        return Err(DerbyError::invalid(format!(
            "random draw must be between 0 and 1, got {}",
            random_draw
        )));
    }

    let base_speed = f64::from(condition) / 100.0;
    let variation = 0.5 + random_draw * 0.5;
    Ok(base_speed * variation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_speed_bounds() {
        assert_eq!(speed(100, 1.0).unwrap(), 1.0);
        assert_eq!(speed(100, 0.0).unwrap(), 0.5);
        assert!((speed(1, 0.0).unwrap() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_speed_scales_with_condition() {
        let slow = speed(40, 0.5).unwrap();
        let fast = speed(80, 0.5).unwrap();
        assert!((fast - 2.0 * slow).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_condition() {
        assert!(matches!(speed(0, 0.5), Err(DerbyError::InvalidArgument(_))));
        assert!(matches!(speed(101, 0.5), Err(DerbyError::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_draw() {
        assert!(speed(50, -0.1).is_err());
        assert!(speed(50, 1.1).is_err());
        assert!(speed(50, f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn speed_stays_in_unit_interval(condition in 1u8..=100, draw in 0.0f64..=1.0) {
            let s = speed(condition, draw).unwrap();
            prop_assert!(s > 0.0);
            prop_assert!(s <= 1.0);
        }
    }
}
