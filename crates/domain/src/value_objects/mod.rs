//! Value objects - Immutable objects defined by their attributes

mod contested;
mod dice;
mod dice_roll;
mod outcome;
mod probability;

// Dice notation and pools
pub use dice::{DiceParseError, DicePool, DiceType, DEFAULT_MAX_EXPLOSIONS};

// Rolling and scoring
pub use dice_roll::{AdvantageRoll, AdvantageType, DieResult, RollResult, SuccessConvention};

// Outcome tiers against a DC
pub use outcome::{DescriptorCategory, OutcomeDetails, SkillOutcome, CRITICAL_MARGIN};

pub use contested::{ContestedCheck, ContestedOutcome};

// Drop tables
pub use probability::{
    DropOutcome, ItemTier, ProbabilityTableError, TierSet, WeightedTable, PROBABILITY_EPSILON,
};
