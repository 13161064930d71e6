//! Pluggable randomness for pattern variation
//!
//! The builder never touches a global RNG. Production sessions use the
//! thread RNG, simulations use a seeded one, and tests script every choice.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resolution used when `chance` is derived from `pick`
const CHANCE_RESOLUTION: usize = 1_000_000;

/// Source of uniform choices
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is always at least 1.
    fn pick(&mut self, len: usize) -> usize;

    /// Bernoulli trial with success probability `probability`
    fn chance(&mut self, probability: f64) -> bool {
        let threshold = (probability.clamp(0.0, 1.0) * CHANCE_RESOLUTION as f64) as usize;
        self.pick(CHANCE_RESOLUTION) < threshold
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }
}

/// Uniform choice from a slice, `None` when empty
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.pick(items.len()).min(items.len() - 1);
    items.get(index)
}

/// Non-deterministic source backed by the thread RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len.max(1))
    }

    fn chance(&mut self, probability: f64) -> bool {
        rand::rng().random_bool(probability.clamp(0.0, 1.0))
    }
}

/// Reproducible source for simulations
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len.max(1))
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }
}

/// Fully scripted source for exact-placement tests.
///
/// Picks are taken from a queue (reduced modulo `len`), chance outcomes from
/// a second queue. Exhausted queues yield `0` and `false`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
    chances: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue of index picks
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Queue of Bernoulli outcomes
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    /// Picks not yet consumed
    pub fn remaining_picks(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_wraps_and_exhausts() {
        let mut rng = ScriptedRandom::new().with_picks([5, 1]).with_chances([true]);
        assert_eq!(rng.pick(3), 2);
        assert_eq!(rng.pick(3), 1);
        assert_eq!(rng.pick(3), 0);
        assert!(rng.chance(0.1));
        assert!(!rng.chance(0.9));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let left: Vec<usize> = (0..20).map(|_| a.pick(10)).collect();
        let right: Vec<usize> = (0..20).map(|_| b.pick(10)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_default_chance_uses_pick() {
        struct Fixed(usize);
        impl RandomSource for Fixed {
            fn pick(&mut self, _len: usize) -> usize {
                self.0
            }
        }
        assert!(Fixed(0).chance(0.1));
        assert!(!Fixed(CHANCE_RESOLUTION - 1).chance(0.1));
        assert!(!Fixed(0).chance(0.0));
    }

    #[test]
    fn test_choose() {
        let mut rng = ScriptedRandom::new().with_picks([1]);
        assert_eq!(choose(&mut rng, &['x', 'y']), Some(&'y'));
        let empty: [char; 0] = [];
        assert_eq!(choose(&mut rng, &empty), None);
    }
}
