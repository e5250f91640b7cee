//! Weighted random selection for small, statically configured tables.

use rand::Rng;

/// Index of one entry of `weights`, chosen with probability
/// `weight / sum(weights)`.
///
/// Draws uniformly from `1..=sum` and returns the first entry whose running
/// total reaches the draw. Zero-weight entries are never chosen.
///
/// # Panics
/// If `weights` is empty or sums to zero.
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, weights: &[u16]) -> usize {
    let total: u32 = weights.iter().map(|&w| u32::from(w)).sum();
    assert!(total > 0, "weighted choice needs at least one positive weight");

    let choice = rng.gen_range(1..=total);
    let mut accumulator = 0_u32;
    for (index, &weight) in weights.iter().enumerate() {
        accumulator += u32::from(weight);
        if accumulator >= choice {
            return index;
        }
    }
    unreachable!("draw {choice} exceeds total weight {total}")
}

/// Value of one `(weight, value)` outcome, chosen by weight.
///
/// # Panics
/// Same preconditions as [`random_index`].
pub fn random_value<'a, T, R: Rng + ?Sized>(rng: &mut R, outcomes: &'a [(u16, T)]) -> &'a T {
    let weights: Vec<u16> = outcomes.iter().map(|(w, _)| *w).collect();
    &outcomes[random_index(rng, &weights)].1
}

/// Fair coin flip.
pub fn random_bool<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_range(0..=1) == 1
}
