//! Random source port
//!
//! The domain never reads a process-wide random source. Every stochastic
//! operation takes a `RandomPort` supplied by the caller, which keeps rolls
//! reproducible under a seeded or scripted source.

#[cfg(any(test, feature = "testing"))]
use std::collections::VecDeque;
#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// Source of randomness injected into every roll and table draw.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn random_range(&self, min: i32, max: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn random_f64(&self) -> f64;
}

/// Replays a fixed script of values, for exact-sequence tests.
///
/// Integers are clamped into the requested range so a script can never
/// produce an impossible die face. An inverted range yields `min` unclamped.
/// When a script runs dry the source keeps returning the lower bound
/// (integers) or `0.0` (floats).
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    ints: Mutex<VecDeque<i32>>,
    floats: Mutex<VecDeque<f64>>,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedRandom {
    /// Script integer draws (die faces, pool indices)
    pub fn with_ints(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            ints: Mutex::new(values.into_iter().collect()),
            floats: Mutex::new(VecDeque::new()),
        }
    }

    /// Script float draws (probability tables)
    pub fn with_floats(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            ints: Mutex::new(VecDeque::new()),
            floats: Mutex::new(values.into_iter().collect()),
        }
    }

    /// Number of integer draws still scripted
    pub fn remaining_ints(&self) -> usize {
        self.ints.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(any(test, feature = "testing"))]
impl RandomPort for ScriptedRandom {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        let next = self
            .ints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(value) if min <= max => value.clamp(min, max),
            _ => min,
        }
    }

    fn random_f64(&self) -> f64 {
        let next = self
            .floats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.map_or(0.0, |value| value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}
