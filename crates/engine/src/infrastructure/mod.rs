//! Infrastructure implementations.
//!
//! Contains port trait implementations for time, randomness and configuration.

pub mod clock;
pub mod ports;
pub mod random;
pub mod settings;
