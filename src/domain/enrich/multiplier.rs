//! Sources for the per-country GDP multiplier.
//!
//! The estimator is a placeholder: `population * multiplier / exchange_rate` with a multiplier
//! drawn uniformly from `[1000, 2000)` for every country on every refresh. Production uses
//! [`RandomMultiplier`]; anything that needs repeatable output injects a seeded or fixed source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::sync::Mutex;

pub const MULTIPLIER_RANGE: Range<f64> = 1000.0..2000.0;

pub trait GdpMultiplier: Send + Sync {
    /// Returns the multiplier for the next country.
    fn next_multiplier(&self) -> f64;
}

/// Fresh thread-local randomness per draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMultiplier;

impl GdpMultiplier for RandomMultiplier {
    fn next_multiplier(&self) -> f64 {
        rand::thread_rng().gen_range(MULTIPLIER_RANGE)
    }
}

/// Deterministic sequence of multipliers from a fixed seed.
#[derive(Debug)]
pub struct SeededMultiplier {
    rng: Mutex<StdRng>,
}

impl SeededMultiplier {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl GdpMultiplier for SeededMultiplier {
    fn next_multiplier(&self) -> f64 {
        // A poisoned lock still holds a usable RNG.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(MULTIPLIER_RANGE)
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl GdpMultiplier for FixedMultiplier {
    fn next_multiplier(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_draws_stay_in_range() {
        let source = RandomMultiplier;
        for _ in 0..1_000 {
            let m = source.next_multiplier();
            assert!(MULTIPLIER_RANGE.contains(&m), "{m} out of range");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededMultiplier::new(42);
        let b = SeededMultiplier::new(42);
        let left: Vec<f64> = (0..16).map(|_| a.next_multiplier()).collect();
        let right: Vec<f64> = (0..16).map(|_| b.next_multiplier()).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|m| MULTIPLIER_RANGE.contains(m)));
    }
}
