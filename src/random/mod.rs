//! # Random Module
//!
//! Uniform and weighted draws over slices.
//!
//! All draws go through [`RandomSource`] so callers can plug in a seeded
//! generator for reproducible results, or a scripted one in tests.

pub mod weighted;

pub use weighted::*;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniform random values.
pub trait RandomSource {
    /// Returns a value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns an index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let index = (self.next_f32() * len as f32) as usize;
        index.min(len.saturating_sub(1))
    }
}

impl RandomSource for StdRng {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

impl RandomSource for ThreadRng {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Creates a generator, seeded when a seed is given and from entropy otherwise.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Picks a uniformly random element, or `None` for an empty slice.
pub fn random_element<'a, T, R: RandomSource + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.next_index(items.len()))
}

/// Sums the usable weights. Negative and NaN weights count as zero.
pub fn total_weight(weights: &[f32]) -> f32 {
    weights.iter().copied().map(sanitize_weight).sum()
}

/// Draws an index with probability proportional to its weight.
///
/// Each index owns the half-open interval `[sum, sum + weight)`, so a zero
/// weight can never be drawn. Returns `None` when the slice is empty or no
/// weight is positive.
///
/// # Examples
///
/// ```
/// use kitbag::{create_rng, random_index_by_weight};
///
/// let mut rng = create_rng(Some(1));
/// let index = random_index_by_weight(&[0.0, 3.0, 0.0], &mut rng);
/// assert_eq!(index, Some(1));
/// ```
pub fn random_index_by_weight<R: RandomSource + ?Sized>(weights: &[f32], rng: &mut R) -> Option<usize> {
    draw_weighted(weights.len(), |i| weights[i], rng)
}

/// Shuffles the slice in place (Fisher-Yates).
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

pub(crate) fn sanitize_weight(weight: f32) -> f32 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Weighted draw over `0..len` using `weight_of` for each index.
///
/// Indices whose weight is zero (after sanitizing) are skipped entirely,
/// which is how the history selector excludes recent picks.
pub(crate) fn draw_weighted<F, R>(len: usize, weight_of: F, rng: &mut R) -> Option<usize>
where
    F: Fn(usize) -> f32,
    R: RandomSource + ?Sized,
{
    let total: f32 = (0..len).map(|i| sanitize_weight(weight_of(i))).sum();
    if total <= 0.0 {
        return None;
    }

    let target = rng.next_f32() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for i in 0..len {
        let weight = sanitize_weight(weight_of(i));
        if weight <= 0.0 {
            continue;
        }
        if target >= cumulative && target < cumulative + weight {
            return Some(i);
        }
        cumulative += weight;
        last_positive = Some(i);
    }

    // Rounding can leave target just past the final boundary.
    last_positive
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedRandom;
    use super::*;

    #[test]
    fn test_random_element_empty() {
        let mut rng = create_rng(Some(3));
        let items: Vec<u8> = Vec::new();
        assert_eq!(random_element(&items, &mut rng), None);
    }

    #[test]
    fn test_random_element_in_bounds() {
        let mut rng = create_rng(Some(3));
        let items = ["a", "b", "c"];
        for _ in 0..100 {
            let picked = random_element(&items, &mut rng).unwrap();
            assert!(items.contains(picked));
        }
    }

    #[test]
    fn test_total_weight_ignores_invalid() {
        assert_eq!(total_weight(&[1.0, -4.0, f32::NAN, 2.5]), 3.5);
        assert_eq!(total_weight(&[]), 0.0);
    }

    #[test]
    fn test_weighted_boundaries_are_half_open() {
        let weights = [1.0, 1.0, 2.0];
        // total 4: [0,1) -> 0, [1,2) -> 1, [2,4) -> 2
        let mut rng = ScriptedRandom::new(vec![0.0, 0.25, 0.49, 0.5, 0.99]);
        let picks: Vec<_> = (0..5)
            .map(|_| random_index_by_weight(&weights, &mut rng).unwrap())
            .collect();
        assert_eq!(picks, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_zero_weight_unreachable() {
        let weights = [0.0, 1.0, 0.0, 1.0];
        let mut rng = create_rng(Some(11));
        for _ in 0..500 {
            let index = random_index_by_weight(&weights, &mut rng).unwrap();
            assert!(index == 1 || index == 3);
        }
    }

    #[test]
    fn test_weighted_no_positive_weight() {
        let mut rng = create_rng(Some(11));
        assert_eq!(random_index_by_weight(&[], &mut rng), None);
        assert_eq!(random_index_by_weight(&[0.0, -1.0], &mut rng), None);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = create_rng(Some(5));
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = create_rng(Some(99));
        let mut b = create_rng(Some(99));
        for _ in 0..10 {
            assert_eq!(a.next_index(1000), b.next_index(1000));
        }
    }
}
