//! Weighted probability tables over ordered tier sets
//!
//! A table assigns a probability to every tier of a closed set plus a chance of
//! no result at all. Tables are validated once at construction and are
//! immutable afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

use crate::random::RandomPort;

/// Allowed deviation of a table's total from 1.0
pub const PROBABILITY_EPSILON: f64 = 0.001;

/// A closed, ordered set of tiers a table can yield.
///
/// `ALL` lists every variant from lowest to highest. That order decides which
/// tier owns each slice of the unit interval during a draw.
pub trait TierSet: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];
}

/// Quality tier of generated loot, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemTier {
    JuryRigged,
    Scavenged,
    ClanForged,
    Optimized,
    MythForged,
}

impl ItemTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JuryRigged => "Jury-Rigged",
            Self::Scavenged => "Scavenged",
            Self::ClanForged => "Clan-Forged",
            Self::Optimized => "Optimized",
            Self::MythForged => "Myth-Forged",
        }
    }
}

impl TierSet for ItemTier {
    const ALL: &'static [Self] = &[
        Self::JuryRigged,
        Self::Scavenged,
        Self::ClanForged,
        Self::Optimized,
        Self::MythForged,
    ];
}

impl fmt::Display for ItemTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors raised while validating a probability table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbabilityTableError {
    #[error("Probability for {tier} cannot be negative (got {value})")]
    NegativeProbability { tier: String, value: f64 },
    #[error("No-result chance cannot be negative (got {0})")]
    NegativeNoResultChance(f64),
    #[error("Probability for {0} is not a finite number")]
    NonFinite(String),
    #[error("Tier {0} is listed more than once")]
    DuplicateTier(String),
    #[error("Probabilities must sum to 1.0 (got {0:.4})")]
    SumOutOfTolerance(f64),
}

/// Result of a single table draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropOutcome<T> {
    Tier(T),
    Nothing,
}

impl<T: Copy> DropOutcome<T> {
    pub fn tier(&self) -> Option<T> {
        match self {
            Self::Tier(tier) => Some(*tier),
            Self::Nothing => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

/// Validated probability table over the tiers of `T`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedTable<T: TierSet> {
    /// Every tier of `T` in `T::ALL` order
    tier_probabilities: Vec<(T, f64)>,
    no_result_chance: f64,
}

impl<T: TierSet> WeightedTable<T> {
    /// Build a table from `(tier, probability)` pairs.
    ///
    /// Tiers that are not listed get probability 0. Every component must be
    /// finite and non-negative, and the total including `no_result_chance`
    /// must be within `PROBABILITY_EPSILON` of 1.0.
    pub fn create(
        probabilities: impl IntoIterator<Item = (T, f64)>,
        no_result_chance: f64,
    ) -> Result<Self, ProbabilityTableError> {
        if !no_result_chance.is_finite() {
            return Err(ProbabilityTableError::NonFinite("no result".to_string()));
        }
        if no_result_chance < 0.0 {
            return Err(ProbabilityTableError::NegativeNoResultChance(
                no_result_chance,
            ));
        }

        let mut tier_probabilities: Vec<(T, f64)> = T::ALL.iter().map(|t| (*t, 0.0)).collect();
        let mut seen = vec![false; tier_probabilities.len()];
        let mut unlisted_total = 0.0;

        for (tier, probability) in probabilities {
            if !probability.is_finite() {
                return Err(ProbabilityTableError::NonFinite(format!("{tier:?}")));
            }
            if probability < 0.0 {
                return Err(ProbabilityTableError::NegativeProbability {
                    tier: format!("{tier:?}"),
                    value: probability,
                });
            }
            match T::ALL.iter().position(|t| *t == tier) {
                Some(index) if seen[index] => {
                    return Err(ProbabilityTableError::DuplicateTier(format!("{tier:?}")));
                }
                Some(index) => {
                    seen[index] = true;
                    tier_probabilities[index].1 = probability;
                }
                // A tier missing from ALL can never be drawn, so it only counts
                // against the total.
                None => unlisted_total += probability,
            }
        }

        let total: f64 = tier_probabilities.iter().map(|(_, p)| p).sum::<f64>()
            + unlisted_total
            + no_result_chance;
        if (total - 1.0).abs() > PROBABILITY_EPSILON || unlisted_total > 0.0 {
            return Err(ProbabilityTableError::SumOutOfTolerance(total));
        }

        Ok(Self {
            tier_probabilities,
            no_result_chance,
        })
    }

    /// Draw once from the table.
    ///
    /// Tiers own consecutive half-open slices of `[0, 1)` in `T::ALL` order,
    /// and whatever remains above the last tier yields `Nothing`. A draw that
    /// lands exactly on a boundary belongs to the higher tier.
    pub fn roll_drop<R: RandomPort + ?Sized>(&self, rng: &R) -> DropOutcome<T> {
        let roll = rng.random_f64();
        let mut cumulative = 0.0;
        for (tier, probability) in &self.tier_probabilities {
            cumulative += probability;
            if roll < cumulative {
                return DropOutcome::Tier(*tier);
            }
        }
        DropOutcome::Nothing
    }

    pub fn probability(&self, tier: T) -> f64 {
        self.tier_probabilities
            .iter()
            .find(|(t, _)| *t == tier)
            .map_or(0.0, |(_, p)| *p)
    }

    pub fn no_result_chance(&self) -> f64 {
        self.no_result_chance
    }

    /// Chance that a draw yields any tier
    pub fn drop_chance(&self) -> f64 {
        self.tier_probabilities.iter().map(|(_, p)| p).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        self.tier_probabilities.iter().copied()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightedTableData<T> {
    tier_probabilities: Vec<(T, f64)>,
    no_result_chance: f64,
}

impl<'de, T> Deserialize<'de> for WeightedTable<T>
where
    T: TierSet + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = WeightedTableData::<T>::deserialize(deserializer)?;
        Self::create(data.tier_probabilities, data.no_result_chance)
            .map_err(serde::de::Error::custom)
    }
}
