//! Random source adapters.
//!
//! `ThreadRandom` draws from the thread-local generator. `SeededRandom` owns a
//! `StdRng` behind a mutex so one reproducible stream can be shared across
//! services and threads.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::RandomPort;

/// Thread-local random - uses real randomness.
pub struct ThreadRandom;

impl ThreadRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for ThreadRandom {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }

    fn random_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded random - the same seed always yields the same sequence.
pub struct SeededRandom {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomPort for SeededRandom {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        self.rng
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .gen_range(min..=max)
    }

    fn random_f64(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = SeededRandom::new(99);
        let b = SeededRandom::new(99);
        let left: Vec<i32> = (0..20).map(|_| a.random_range(1, 10)).collect();
        let right: Vec<i32> = (0..20).map(|_| b.random_range(1, 10)).collect();
        assert_eq!(left, right);
        assert_eq!(a.seed(), 99);
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let rng = SeededRandom::new(1);
        let draws: Vec<i32> = (0..2_000).map(|_| rng.random_range(1, 4)).collect();
        assert!(draws.iter().all(|d| (1..=4).contains(d)));
        assert!(draws.contains(&1));
        assert!(draws.contains(&4));
    }

    #[test]
    fn test_thread_random_stays_in_range() {
        let rng = ThreadRandom::new();
        for _ in 0..500 {
            assert!((1..=6).contains(&rng.random_range(1, 6)));
            let f = rng.random_f64();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let rng = std::sync::Arc::new(SeededRandom::new(5));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rng = rng.clone();
                std::thread::spawn(move || rng.random_range(1, 10))
            })
            .collect();
        for handle in handles {
            let value = handle.join().expect("thread panicked");
            assert!((1..=10).contains(&value));
        }
    }
}
