//! Domain entities - Mutable objects that accumulate state across rolls

mod extended_check;
mod roll_history;
mod weighted_pool;

pub use extended_check::{
    ExtendedCheck, ExtendedCheckError, ExtendedCheckStatus, ExtendedRound,
    CATASTROPHIC_FUMBLE_STREAK, DEFAULT_MAX_ROUNDS, FUMBLE_PENALTY,
};
pub use roll_history::{RollHistory, RollRecord, MAX_RECENT_ROLLS};
pub use weighted_pool::{WeightedItem, WeightedPool, WeightedPoolError, MAX_TOTAL_WEIGHT};
