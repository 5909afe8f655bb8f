//! Extended check - Net successes accumulated over several rounds
//!
//! Each round's net successes add to a running total until the target is
//! reached or the rounds run out. A fumble costs accumulated progress, and
//! a run of fumbles ends the attempt outright.
//!
//! # State Transitions
//!
//! ```text
//! InProgress -> Succeeded (accumulated reaches the target)
//! InProgress -> Failed (last allowed round ends short of the target)
//! InProgress -> CatastrophicFailure (too many fumbles in a row)
//! InProgress -> Abandoned (caller gives up)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ExtendedCheckId;
use crate::value_objects::{DicePool, RollResult};

/// Rounds allowed when the caller does not choose a limit
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Accumulated successes lost on each fumbled round
pub const FUMBLE_PENALTY: u32 = 2;

/// Consecutive fumbles that end the check as a catastrophic failure
pub const CATASTROPHIC_FUMBLE_STREAK: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtendedCheckError {
    #[error("Target successes must be at least 1")]
    InvalidTarget,
    #[error("Max rounds must be at least 1")]
    InvalidMaxRounds,
    #[error("Extended check is not in progress: {0}")]
    NotInProgress(ExtendedCheckStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedCheckStatus {
    #[default]
    InProgress,
    Succeeded,
    /// Rounds ran out before the target was reached
    Failed,
    CatastrophicFailure,
    Abandoned,
}

impl ExtendedCheckStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::CatastrophicFailure => "Catastrophic Failure",
            Self::Abandoned => "Abandoned",
        }
    }
}

impl std::fmt::Display for ExtendedCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Summary of one processed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedRound {
    pub round: u32,
    pub net_successes: u32,
    pub is_fumble: bool,
    /// Accumulated total after this round, penalty applied
    pub accumulated: u32,
}

/// A multi-round check working toward a success target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedCheck {
    id: ExtendedCheckId,
    pool: DicePool,
    target_successes: u32,
    max_rounds: u32,
    accumulated_successes: u32,
    consecutive_fumbles: u32,
    status: ExtendedCheckStatus,
    rounds: Vec<ExtendedRound>,
}

impl ExtendedCheck {
    pub fn new(
        pool: DicePool,
        target_successes: u32,
        max_rounds: u32,
    ) -> Result<Self, ExtendedCheckError> {
        if target_successes == 0 {
            return Err(ExtendedCheckError::InvalidTarget);
        }
        if max_rounds == 0 {
            return Err(ExtendedCheckError::InvalidMaxRounds);
        }
        Ok(Self {
            id: ExtendedCheckId::new(),
            pool,
            target_successes,
            max_rounds,
            accumulated_successes: 0,
            consecutive_fumbles: 0,
            status: ExtendedCheckStatus::InProgress,
            rounds: Vec::new(),
        })
    }

    /// Apply one round's roll and return the resulting status
    pub fn process_round(
        &mut self,
        roll: &RollResult,
    ) -> Result<ExtendedCheckStatus, ExtendedCheckError> {
        self.ensure_active()?;

        if roll.is_fumble() {
            self.consecutive_fumbles += 1;
            self.accumulated_successes = self.accumulated_successes.saturating_sub(FUMBLE_PENALTY);
        } else {
            self.consecutive_fumbles = 0;
            self.accumulated_successes = self
                .accumulated_successes
                .saturating_add(roll.net_successes());
        }

        let round = self.rounds_completed() + 1;
        self.rounds.push(ExtendedRound {
            round,
            net_successes: roll.net_successes(),
            is_fumble: roll.is_fumble(),
            accumulated: self.accumulated_successes,
        });

        // Catastrophe outranks success, success outranks running out of rounds
        self.status = if self.consecutive_fumbles >= CATASTROPHIC_FUMBLE_STREAK {
            ExtendedCheckStatus::CatastrophicFailure
        } else if self.accumulated_successes >= self.target_successes {
            ExtendedCheckStatus::Succeeded
        } else if round >= self.max_rounds {
            ExtendedCheckStatus::Failed
        } else {
            ExtendedCheckStatus::InProgress
        };
        Ok(self.status)
    }

    /// Give up on an in-progress check
    pub fn abandon(&mut self) -> Result<(), ExtendedCheckError> {
        self.ensure_active()?;
        self.status = ExtendedCheckStatus::Abandoned;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), ExtendedCheckError> {
        if self.status.is_active() {
            Ok(())
        } else {
            Err(ExtendedCheckError::NotInProgress(self.status))
        }
    }

    pub fn id(&self) -> ExtendedCheckId {
        self.id
    }

    pub fn pool(&self) -> &DicePool {
        &self.pool
    }

    pub fn target_successes(&self) -> u32 {
        self.target_successes
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn accumulated_successes(&self) -> u32 {
        self.accumulated_successes
    }

    pub fn consecutive_fumbles(&self) -> u32 {
        self.consecutive_fumbles
    }

    pub fn status(&self) -> ExtendedCheckStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn rounds(&self) -> &[ExtendedRound] {
        &self.rounds
    }

    pub fn rounds_completed(&self) -> u32 {
        u32::try_from(self.rounds.len()).unwrap_or(u32::MAX)
    }

    pub fn rounds_remaining(&self) -> u32 {
        self.max_rounds.saturating_sub(self.rounds_completed())
    }

    /// Successes still needed to finish
    pub fn remaining_successes(&self) -> u32 {
        self.target_successes
            .saturating_sub(self.accumulated_successes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn roll(faces: [i32; 3]) -> RollResult {
        let rng = ScriptedRandom::with_ints(faces);
        DicePool::parse("3d10").expect("valid").roll(&rng)
    }

    const TWO_NET: [i32; 3] = [9, 10, 4];
    const ONE_NET: [i32; 3] = [8, 3, 4];
    const FUMBLE: [i32; 3] = [1, 3, 4];

    fn check(target: u32, max_rounds: u32) -> ExtendedCheck {
        ExtendedCheck::new(DicePool::parse("3d10").expect("valid"), target, max_rounds)
            .expect("valid check")
    }

    #[test]
    fn test_rejects_zero_target_and_rounds() {
        let pool = DicePool::parse("3d10").expect("valid");
        assert_eq!(
            ExtendedCheck::new(pool, 0, 5),
            Err(ExtendedCheckError::InvalidTarget)
        );
        assert_eq!(
            ExtendedCheck::new(pool, 5, 0),
            Err(ExtendedCheckError::InvalidMaxRounds)
        );
    }

    #[test]
    fn test_accumulates_until_target() {
        let mut check = check(5, DEFAULT_MAX_ROUNDS);
        assert_eq!(check.process_round(&roll(TWO_NET)), Ok(ExtendedCheckStatus::InProgress));
        assert_eq!(check.process_round(&roll(TWO_NET)), Ok(ExtendedCheckStatus::InProgress));
        assert_eq!(check.remaining_successes(), 1);
        assert_eq!(check.process_round(&roll(TWO_NET)), Ok(ExtendedCheckStatus::Succeeded));
        assert_eq!(check.accumulated_successes(), 6);
        assert_eq!(check.rounds_completed(), 3);
        assert!(!check.is_active());
    }

    #[test]
    fn test_running_out_of_rounds_fails() {
        let mut check = check(10, 2);
        check.process_round(&roll(ONE_NET)).expect("round 1");
        assert_eq!(check.rounds_remaining(), 1);
        assert_eq!(check.process_round(&roll(ONE_NET)), Ok(ExtendedCheckStatus::Failed));
        assert_eq!(check.accumulated_successes(), 2);
    }

    #[test]
    fn test_success_on_last_round_wins() {
        let mut check = check(2, 1);
        assert_eq!(check.process_round(&roll(TWO_NET)), Ok(ExtendedCheckStatus::Succeeded));
    }

    #[test]
    fn test_fumble_costs_two_successes_floored_at_zero() {
        let mut check = check(20, DEFAULT_MAX_ROUNDS);
        check.process_round(&roll(TWO_NET)).expect("round");
        check.process_round(&roll(ONE_NET)).expect("round");
        check.process_round(&roll(FUMBLE)).expect("round");
        assert_eq!(check.accumulated_successes(), 1);
        check.process_round(&roll(FUMBLE)).expect("round");
        assert_eq!(check.accumulated_successes(), 0);
        assert_eq!(check.consecutive_fumbles(), 2);

        let last = check.rounds().last().copied().expect("recorded");
        assert!(last.is_fumble);
        assert_eq!(last.round, 4);
        assert_eq!(last.accumulated, 0);
    }

    #[test]
    fn test_three_consecutive_fumbles_is_catastrophic() {
        let mut check = check(20, DEFAULT_MAX_ROUNDS);
        check.process_round(&roll(FUMBLE)).expect("round");
        check.process_round(&roll(FUMBLE)).expect("round");
        assert_eq!(
            check.process_round(&roll(FUMBLE)),
            Ok(ExtendedCheckStatus::CatastrophicFailure)
        );
    }

    #[test]
    fn test_non_fumble_resets_fumble_streak() {
        let mut check = check(20, DEFAULT_MAX_ROUNDS);
        check.process_round(&roll(FUMBLE)).expect("round");
        check.process_round(&roll(FUMBLE)).expect("round");
        check.process_round(&roll(ONE_NET)).expect("round");
        assert_eq!(check.consecutive_fumbles(), 0);
        assert_eq!(check.process_round(&roll(FUMBLE)), Ok(ExtendedCheckStatus::InProgress));
    }

    #[test]
    fn test_abandon_and_finished_checks_reject_rounds() {
        let mut check = check(5, DEFAULT_MAX_ROUNDS);
        check.process_round(&roll(ONE_NET)).expect("round");
        check.abandon().expect("abandon");
        assert_eq!(check.status(), ExtendedCheckStatus::Abandoned);
        assert_eq!(
            check.process_round(&roll(TWO_NET)),
            Err(ExtendedCheckError::NotInProgress(ExtendedCheckStatus::Abandoned))
        );
        assert_eq!(
            check.abandon(),
            Err(ExtendedCheckError::NotInProgress(ExtendedCheckStatus::Abandoned))
        );
        assert_eq!(check.rounds_completed(), 1);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_value(ExtendedCheckStatus::CatastrophicFailure).expect("serialize");
        assert_eq!(json, "catastrophicFailure");
    }
}
