//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Clock (so history timestamps are testable)
//! - Random (owned by the domain, re-exported here so adapters implement one trait)

use chrono::{DateTime, Utc};

pub use runeforge_domain::RandomPort;

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
