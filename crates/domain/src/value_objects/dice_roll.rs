//! Rolling dice pools and scoring the result
//!
//! Pools use success counting: every rolled face at or above the success
//! threshold is a success, every face equal to the botch face is a botch.
//! Net successes are successes minus botches, never below zero.

use serde::{Deserialize, Serialize};

use super::dice::DicePool;
use crate::random::RandomPort;

/// Face value scoring rules shared by every pool roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessConvention {
    /// Faces at or above this value count as a success
    pub success_threshold: u32,
    /// Faces equal to this value count as a botch
    pub botch_face: u32,
    /// Net successes at or above this value make a critical success
    pub critical_threshold: u32,
}

impl SuccessConvention {
    pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 8;
    pub const DEFAULT_BOTCH_FACE: u32 = 1;
    pub const DEFAULT_CRITICAL_THRESHOLD: u32 = 5;

    pub fn new(success_threshold: u32, botch_face: u32, critical_threshold: u32) -> Self {
        Self {
            success_threshold,
            botch_face,
            critical_threshold,
        }
    }

    /// Score a single face: +1 success, -1 botch, 0 otherwise
    pub fn score(&self, face: u32) -> i32 {
        if face >= self.success_threshold {
            1
        } else if face == self.botch_face {
            -1
        } else {
            0
        }
    }
}

impl Default for SuccessConvention {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SUCCESS_THRESHOLD,
            Self::DEFAULT_BOTCH_FACE,
            Self::DEFAULT_CRITICAL_THRESHOLD,
        )
    }
}

/// Faces rolled for one original die: the first roll, then any explosions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieResult {
    faces: Vec<u32>,
}

impl DieResult {
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// The die's contribution: all of its faces summed
    pub fn total(&self) -> u32 {
        self.faces.iter().sum()
    }

    /// Extra rolls caused by exploding
    pub fn explosions(&self) -> usize {
        self.faces.len().saturating_sub(1)
    }
}

/// Result of rolling a dice pool
///
/// Produced once per roll and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pool: DicePool,
    dice: Vec<DieResult>,
    successes: u32,
    botches: u32,
    net_successes: u32,
    is_fumble: bool,
    is_critical_success: bool,
}

impl RollResult {
    /// Score already-rolled dice under a convention
    pub fn from_dice(pool: DicePool, dice: Vec<DieResult>, convention: &SuccessConvention) -> Self {
        let mut successes = 0u32;
        let mut botches = 0u32;
        for face in dice.iter().flat_map(|die| die.faces.iter().copied()) {
            match convention.score(face) {
                1 => successes += 1,
                -1 => botches += 1,
                _ => {}
            }
        }

        let net_successes = successes.saturating_sub(botches);
        let is_fumble = net_successes == 0 && botches > 0;
        let is_critical_success = !is_fumble && net_successes >= convention.critical_threshold;

        Self {
            pool,
            dice,
            successes,
            botches,
            net_successes,
            is_fumble,
            is_critical_success,
        }
    }

    pub fn pool(&self) -> &DicePool {
        &self.pool
    }

    /// Per-die breakdown, in roll order
    pub fn dice(&self) -> &[DieResult] {
        &self.dice
    }

    /// Every face rolled, explosions included, in roll order
    pub fn raw_rolls(&self) -> Vec<u32> {
        self.dice
            .iter()
            .flat_map(|die| die.faces.iter().copied())
            .collect()
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn botches(&self) -> u32 {
        self.botches
    }

    pub fn net_successes(&self) -> u32 {
        self.net_successes
    }

    /// Zero net successes with at least one botch
    pub fn is_fumble(&self) -> bool {
        self.is_fumble
    }

    pub fn is_critical_success(&self) -> bool {
        self.is_critical_success
    }

    /// Number of extra rolls caused by exploding dice
    pub fn explosion_count(&self) -> usize {
        self.dice.iter().map(DieResult::explosions).sum()
    }

    /// Sum of every face rolled
    pub fn raw_total(&self) -> i64 {
        self.dice.iter().map(|die| i64::from(die.total())).sum()
    }

    /// Sum of every face plus the pool modifier (damage-style rolls)
    pub fn total(&self) -> i64 {
        self.raw_total() + i64::from(self.pool.modifier())
    }
}

/// Whether a roll is made once, or twice keeping the better or worse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvantageType {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

/// An advantage or disadvantage roll: the result kept and the one discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvantageRoll {
    pub advantage: AdvantageType,
    pub kept: RollResult,
    /// None for a normal roll
    pub discarded: Option<RollResult>,
}

impl DicePool {
    /// Roll under the default success convention
    pub fn roll<R: RandomPort + ?Sized>(&self, rng: &R) -> RollResult {
        self.roll_with(rng, &SuccessConvention::default())
    }

    /// Roll under a specific success convention
    ///
    /// When the pool explodes, a die showing its maximum face is rolled again,
    /// at most `max_explosions` extra times per original die.
    pub fn roll_with<R: RandomPort + ?Sized>(
        &self,
        rng: &R,
        convention: &SuccessConvention,
    ) -> RollResult {
        let faces = self.faces();
        let mut dice = Vec::with_capacity(self.count() as usize);

        for _ in 0..self.count() {
            let mut die = vec![roll_die(rng, faces)];

            if self.is_exploding() {
                let mut explosions = 0;
                while die.last() == Some(&faces) && explosions < self.max_explosions() {
                    die.push(roll_die(rng, faces));
                    explosions += 1;
                }
            }

            dice.push(DieResult::new(die));
        }

        RollResult::from_dice(*self, dice, convention)
    }

    /// Roll once, or twice keeping the higher/lower net successes
    ///
    /// Ties keep the first roll.
    pub fn roll_with_advantage<R: RandomPort + ?Sized>(
        &self,
        rng: &R,
        advantage: AdvantageType,
        convention: &SuccessConvention,
    ) -> AdvantageRoll {
        let first = self.roll_with(rng, convention);
        if advantage == AdvantageType::Normal {
            return AdvantageRoll {
                advantage,
                kept: first,
                discarded: None,
            };
        }

        let second = self.roll_with(rng, convention);
        let keep_first = match advantage {
            AdvantageType::Advantage => first.net_successes() >= second.net_successes(),
            AdvantageType::Disadvantage => first.net_successes() <= second.net_successes(),
            AdvantageType::Normal => true,
        };

        let (kept, discarded) = if keep_first {
            (first, second)
        } else {
            (second, first)
        };

        AdvantageRoll {
            advantage,
            kept,
            discarded: Some(discarded),
        }
    }
}

fn roll_die<R: RandomPort + ?Sized>(rng: &R, faces: u32) -> u32 {
    // Faces are at most 10, so the i32 round trip is lossless
    let max = i32::try_from(faces).unwrap_or(i32::MAX);
    u32::try_from(rng.random_range(1, max)).unwrap_or(1)
}
