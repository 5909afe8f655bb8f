//! Runeforge domain: dice pools, roll scoring, outcome tiers and weighted tables.
//!
//! Everything here is synchronous and pure apart from drawing numbers from a
//! caller-supplied [`RandomPort`].

pub mod entities;
pub mod error;
pub mod ids;
pub mod random;
pub mod value_objects;

pub use entities::{
    ExtendedCheck, ExtendedCheckError, ExtendedCheckStatus, ExtendedRound, RollHistory, RollRecord,
    WeightedItem, WeightedPool, WeightedPoolError, CATASTROPHIC_FUMBLE_STREAK, DEFAULT_MAX_ROUNDS,
    FUMBLE_PENALTY, MAX_RECENT_ROLLS, MAX_TOTAL_WEIGHT,
};

pub use error::DomainError;

pub use ids::{ExtendedCheckId, RollHistoryId, RollId};

pub use random::RandomPort;
#[cfg(any(test, feature = "testing"))]
pub use random::ScriptedRandom;

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    AdvantageRoll, AdvantageType, ContestedCheck, ContestedOutcome, DescriptorCategory,
    DiceParseError, DicePool, DiceType, DieResult, DropOutcome, ItemTier, OutcomeDetails,
    ProbabilityTableError, RollResult, SkillOutcome, SuccessConvention, TierSet, WeightedTable,
    CRITICAL_MARGIN, DEFAULT_MAX_EXPLOSIONS, PROBABILITY_EPSILON,
};
