//! Uniform random selection without replacement

use crate::core::error::{DerbyError, Result};
use crate::core::rng::RandomSource;

/// Draw `count` distinct elements from `population` in uniformly random order
///
/// Fisher-Yates shuffles a copy of the whole population and keeps the first
/// `count` entries, so both the chosen set and its order are uniform. The
/// source slice is never touched.
pub fn sample<T: Clone, R: RandomSource + ?Sized>(
    population: &[T],
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>> {
    if count == 0 {
        return Err(DerbyError::invalid("sample count must be positive"));
    }
    if count > population.len() {
        return Err(DerbyError::invalid(format!(
            "cannot sample {} from a population of {}",
            count,
            population.len()
        )));
    }

    let mut shuffled = population.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.next_below(i + 1);
        shuffled.swap(i, j);
    }
    shuffled.truncate(count);
    Ok(shuffled)
}
